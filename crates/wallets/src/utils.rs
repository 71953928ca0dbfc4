use crate::{PendingSigner, WalletSigner, error::PrivateKeyError};
use alloy_primitives::{Address, B256, hex::FromHex};
use alloy_signer_local::PrivateKeySigner;
use eyre::{Context, Result};
use msig_config::Config;
use std::{
    fs,
    path::{Path, PathBuf},
};

fn ensure_pk_not_env(pk: &str) -> Result<()> {
    if !pk.starts_with("0x") && std::env::var(pk).is_ok() {
        return Err(PrivateKeyError::ExistsAsEnvVar(pk.to_string()).into());
    }
    Ok(())
}

/// Validates and sanitizes user inputs, returning configured [WalletSigner].
pub fn create_private_key_signer(private_key_str: &str) -> Result<WalletSigner> {
    let private_key_str = private_key_str.trim();
    let Ok(private_key) = B256::from_hex(private_key_str) else {
        ensure_pk_not_env(private_key_str)?;
        eyre::bail!("Failed to decode private key")
    };
    match PrivateKeySigner::from_bytes(&private_key) {
        Ok(pk) => Ok(WalletSigner::Local(pk)),
        Err(err) => {
            ensure_pk_not_env(private_key_str)?;
            eyre::bail!("Failed to create wallet from private key: {err}")
        }
    }
}

/// Creates [WalletSigner] instance from given mnemonic parameters.
///
/// Mnemonic can be either a file path or a mnemonic phrase.
pub fn create_mnemonic_signer(
    mnemonic: &str,
    passphrase: Option<&str>,
    hd_path: Option<&str>,
    index: u32,
) -> Result<WalletSigner> {
    let mnemonic = if Path::new(mnemonic).is_file() {
        fs::read_to_string(mnemonic)?
    } else {
        mnemonic.to_owned()
    };
    let mnemonic = mnemonic.split_whitespace().collect::<Vec<_>>().join(" ");

    Ok(WalletSigner::from_mnemonic(&mnemonic, passphrase, hd_path, index)?)
}

/// Resolves the keystore file from an explicit path or an account name in `~/.msig/keystores`.
pub fn maybe_get_keystore_path(
    maybe_path: Option<&str>,
    maybe_name: Option<&str>,
) -> Result<Option<PathBuf>> {
    if let Some(path) = maybe_path {
        return Ok(Some(PathBuf::from(path)));
    }

    if let Some(name) = maybe_name {
        let default_keystore_dir = Config::msig_keystores_dir()
            .ok_or_else(|| eyre::eyre!("Could not find the default keystore directory."))?;
        if let Some(found_path) = find_keystore_by_name(&default_keystore_dir, name) {
            return Ok(Some(found_path));
        }

        // the missing path makes for a better error message later on
        return Ok(Some(default_keystore_dir.join(name)));
    }

    Ok(None)
}

/// Finds a keystore file by account name: either the exact file name or
/// `<account_name>_<checksummed address>`.
pub fn find_keystore_by_name(keystore_dir: &Path, account_name: &str) -> Option<PathBuf> {
    let direct_path = keystore_dir.join(account_name);
    if direct_path.exists() {
        return Some(direct_path);
    }

    let search_prefix = format!("{account_name}_");
    fs::read_dir(keystore_dir).ok()?.flatten().find_map(|entry| {
        let file_name = entry.file_name();
        let file_name = file_name.to_str()?;
        (file_name.starts_with(&search_prefix)
            && Address::parse_checksummed(&file_name[search_prefix.len()..], None).is_ok())
        .then(|| entry.path())
    })
}

/// Creates keystore signer from given parameters.
///
/// If a password or password file is provided, the keystore is decrypted and a [WalletSigner]
/// is returned. Otherwise a [PendingSigner] is returned, which prompts for the password when
/// unlocked.
pub fn create_keystore_signer(
    path: &Path,
    maybe_password: Option<&str>,
    maybe_password_file: Option<&str>,
) -> Result<(Option<WalletSigner>, Option<PendingSigner>)> {
    if !path.exists() {
        eyre::bail!("Keystore file `{path:?}` does not exist")
    }

    if path.is_dir() {
        eyre::bail!(
            "Keystore path `{path:?}` is a directory. Please specify the keystore file directly."
        )
    }

    let password = match (maybe_password, maybe_password_file) {
        (Some(password), _) => Some(password.to_string()),
        (_, Some(password_file)) => {
            let password_file = Path::new(password_file);
            if !password_file.is_file() {
                eyre::bail!("Keystore password file `{password_file:?}` does not exist")
            }
            Some(
                fs::read_to_string(password_file)
                    .wrap_err_with(|| {
                        format!("Failed to read keystore password file at {password_file:?}")
                    })?
                    .trim_end()
                    .to_string(),
            )
        }
        (None, None) => None,
    };

    if let Some(password) = password {
        let wallet = PrivateKeySigner::decrypt_keystore(path, password)
            .wrap_err_with(|| format!("Failed to decrypt keystore {path:?}"))?;
        Ok((Some(WalletSigner::Local(wallet)), None))
    } else {
        Ok((None, Some(PendingSigner::Keystore(path.to_path_buf()))))
    }
}
