//! # msig-wallets
//!
//! Utilities for unlocking the account that signs multisig calls.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate tracing;

pub mod error;
pub use error::WalletError;

mod raw_wallet;
pub use raw_wallet::RawWallet;

mod signer;
pub use signer::{PendingSigner, WalletSigner};

pub mod utils;

mod wallet;
pub use wallet::WalletOpts;
