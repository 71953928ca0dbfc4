use alloy_primitives::hex::FromHexError;
use alloy_signer::k256::ecdsa;
use alloy_signer_local::LocalSignerError;

#[derive(Debug, thiserror::Error)]
pub enum PrivateKeyError {
    #[error(
        "Failed to create wallet from private key. Invalid private key. But env var {0} exists. Is the `$` anchor missing?"
    )]
    ExistsAsEnvVar(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WalletSignerError {
    #[error(transparent)]
    Local(#[from] LocalSignerError),
    #[error("Failed to decrypt keystore: incorrect password")]
    IncorrectKeystorePassword,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    InvalidHex(#[from] FromHexError),
    #[error(transparent)]
    Ecdsa(#[from] ecdsa::Error),
}

/// Errors resolving the account that signs multisig calls.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error(
        "wallet not connected: pass --private-key, --mnemonic, --keystore, --account or --interactive"
    )]
    NotConnected,
}
