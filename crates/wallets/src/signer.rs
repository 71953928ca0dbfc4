use crate::error::WalletSignerError;
use alloy_consensus::SignableTransaction;
use alloy_network::{EthereumWallet, TxSigner};
use alloy_primitives::{Address, B256, Signature, hex::FromHex};
use alloy_signer_local::{
    LocalSignerError, MnemonicBuilder, PrivateKeySigner, coins_bip39::English,
};
use async_trait::async_trait;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, WalletSignerError>;

/// Wrapper enum around the signers an owner can unlock.
#[derive(Debug)]
pub enum WalletSigner {
    /// Wrapper around local wallet. e.g. private key, mnemonic
    Local(PrivateKeySigner),
}

impl WalletSigner {
    pub fn from_private_key(private_key: &B256) -> Result<Self> {
        Ok(Self::Local(PrivateKeySigner::from_bytes(private_key)?))
    }

    /// Derives the signer from a mnemonic phrase.
    ///
    /// An explicit derivation path takes precedence over `index`, which otherwise selects the
    /// account on the default `m/44'/60'/0'/0/{index}` path.
    pub fn from_mnemonic(
        mnemonic: &str,
        passphrase: Option<&str>,
        derivation_path: Option<&str>,
        index: u32,
    ) -> Result<Self> {
        let mut builder = MnemonicBuilder::<English>::default().phrase(mnemonic);

        if let Some(passphrase) = passphrase {
            builder = builder.password(passphrase)
        }

        builder = if let Some(hd_path) = derivation_path {
            builder.derivation_path(hd_path)?
        } else {
            builder.index(index)?
        };

        Ok(Self::Local(builder.build()?))
    }

    /// The address of the account.
    pub fn address(&self) -> Address {
        match self {
            Self::Local(local) => local.address(),
        }
    }

    /// Turns the signer into the network wallet used to fill and sign transactions.
    pub fn into_wallet(self) -> EthereumWallet {
        EthereumWallet::from(self)
    }
}

#[async_trait]
impl TxSigner<Signature> for WalletSigner {
    fn address(&self) -> Address {
        Self::address(self)
    }

    async fn sign_transaction(
        &self,
        tx: &mut dyn SignableTransaction<Signature>,
    ) -> alloy_signer::Result<Signature> {
        match self {
            Self::Local(local) => TxSigner::sign_transaction(local, tx).await,
        }
    }
}

/// Signers that require user action to be obtained.
#[derive(Debug, Clone)]
pub enum PendingSigner {
    Keystore(PathBuf),
    Interactive,
}

impl PendingSigner {
    /// Prompts for the keystore password or the private key.
    pub fn unlock(self) -> Result<WalletSigner> {
        match self {
            Self::Keystore(path) => {
                let password = rpassword::prompt_password("Enter keystore password:")?;
                match PrivateKeySigner::decrypt_keystore(path, password) {
                    Ok(signer) => Ok(WalletSigner::Local(signer)),
                    Err(LocalSignerError::EthKeystoreError(
                        eth_keystore::KeystoreError::MacMismatch,
                    )) => Err(WalletSignerError::IncorrectKeystorePassword),
                    Err(e) => Err(WalletSignerError::Local(e)),
                }
            }
            Self::Interactive => {
                let private_key = rpassword::prompt_password("Enter private key:")?;
                WalletSigner::from_private_key(&B256::from_hex(private_key.trim())?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    #[test]
    fn derives_from_mnemonic_index() {
        let signer = WalletSigner::from_mnemonic(TEST_MNEMONIC, None, None, 0).unwrap();
        assert_eq!(
            signer.address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
        );

        let second = WalletSigner::from_mnemonic(TEST_MNEMONIC, None, None, 1).unwrap();
        assert_eq!(
            second.address(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn derivation_path_overrides_index() {
        let signer =
            WalletSigner::from_mnemonic(TEST_MNEMONIC, None, Some("m/44'/60'/0'/0/1"), 0).unwrap();
        assert_eq!(
            signer.address(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn rejects_zero_key() {
        assert!(WalletSigner::from_private_key(&B256::ZERO).is_err());
    }
}
