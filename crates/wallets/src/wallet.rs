use crate::{
    PendingSigner, WalletSigner,
    error::WalletError,
    raw_wallet::RawWallet,
    utils::{
        create_keystore_signer, create_mnemonic_signer, create_private_key_signer,
        maybe_get_keystore_path,
    },
};
use alloy_primitives::Address;
use clap::Parser;
use eyre::Result;
use serde::Serialize;

/// The wallet options can either be:
/// 1. Raw (via private key / mnemonic file, see `RawWallet`)
/// 2. Keystore (via file path or account name)
///
/// An owner has to unlock one of them to submit, confirm, revoke or execute transactions.
#[derive(Clone, Debug, Default, Serialize, Parser)]
#[command(next_help_heading = "Wallet options", about = None, long_about = None)]
pub struct WalletOpts {
    /// The sender account.
    #[arg(
        long,
        short,
        value_name = "ADDRESS",
        help_heading = "Wallet options - raw",
        env = "ETH_FROM"
    )]
    pub from: Option<Address>,

    #[command(flatten)]
    pub raw: RawWallet,

    /// Use the keystore by its filename in the given folder.
    #[arg(
        long = "keystore",
        visible_alias = "keystores",
        help_heading = "Wallet options - keystore",
        value_name = "PATH",
        env = "ETH_KEYSTORE"
    )]
    pub keystore_path: Option<String>,

    /// Use a keystore from the default keystores folder (~/.msig/keystores) by its filename.
    #[arg(
        long = "account",
        help_heading = "Wallet options - keystore",
        value_name = "ACCOUNT_NAME",
        env = "ETH_KEYSTORE_ACCOUNT",
        conflicts_with = "keystore_path"
    )]
    pub keystore_account_name: Option<String>,

    /// The keystore password.
    #[arg(long = "password", help_heading = "Wallet options - keystore", value_name = "PASSWORD")]
    #[serde(skip)]
    pub keystore_password: Option<String>,

    /// The keystore password file path.
    #[arg(
        long = "password-file",
        help_heading = "Wallet options - keystore",
        value_name = "PASSWORD_FILE",
        env = "ETH_PASSWORD"
    )]
    pub keystore_password_file: Option<String>,
}

impl WalletOpts {
    /// Unlocks the configured signer.
    ///
    /// Sources are tried in order: private key, mnemonic, interactive prompt, keystore. Without
    /// any of them the wallet is not connected.
    pub fn signer(&self) -> Result<WalletSigner> {
        trace!("start finding signer");

        let signer = if let Some(private_key) = &self.raw.private_key {
            trace!("using private key");
            create_private_key_signer(private_key)?
        } else if let Some(mnemonic) = &self.raw.mnemonic {
            trace!("using mnemonic");
            create_mnemonic_signer(
                mnemonic,
                self.raw.mnemonic_passphrase.as_deref(),
                self.raw.hd_path.as_deref(),
                self.raw.mnemonic_index,
            )?
        } else if self.raw.interactive {
            trace!("using interactive prompt");
            PendingSigner::Interactive.unlock()?
        } else if let Some(path) = maybe_get_keystore_path(
            self.keystore_path.as_deref(),
            self.keystore_account_name.as_deref(),
        )? {
            trace!(?path, "using keystore");
            match create_keystore_signer(
                &path,
                self.keystore_password.as_deref(),
                self.keystore_password_file.as_deref(),
            )? {
                (Some(signer), _) => signer,
                (None, Some(pending)) => pending.unlock()?,
                (None, None) => return Err(WalletError::NotConnected.into()),
            }
        } else {
            return Err(WalletError::NotConnected.into());
        };

        if let Some(from) = self.from
            && from != signer.address()
        {
            eyre::bail!(
                "the sender {from} does not match the address of the unlocked signer {}",
                signer.address()
            )
        }

        Ok(signer)
    }

    /// Whether any signer source was passed.
    pub fn has_signer(&self) -> bool {
        self.raw.private_key.is_some()
            || self.raw.mnemonic.is_some()
            || self.raw.interactive
            || self.keystore_path.is_some()
            || self.keystore_account_name.is_some()
    }
}
