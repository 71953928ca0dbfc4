//! # msig-common
//!
//! Common utilities shared by the msig crates: unit conversion, input validation, display
//! helpers, provider construction and terminal output.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate tracing;

pub mod errors;
pub mod fmt;
pub mod io;
pub mod provider;
pub mod retry;
pub mod units;
pub mod validate;

pub use io::shell;
pub use provider::{ProviderBuilder, RetryProvider};
pub use retry::Retry;

/// The default timeout for a single RPC request.
pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(45);

/// Decimals of the native currency on every supported network.
pub const NATIVE_DECIMALS: u8 = 18;
