//! # msig
//!
//! A terminal dashboard for a multisig wallet contract: reads the owners, the confirmation
//! threshold and the transaction records, and drives the submit / confirm / revoke / execute
//! calls through a local signer.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate tracing;

pub mod binding;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod poll;
pub mod query;
pub mod render;
pub mod types;
pub mod write;

pub use binding::{IMultiSigWallet, MultisigCall};
pub use client::{MultisigClient, MultisigReader};
pub use dashboard::{Dashboard, Snapshot, StatusFilter, TxFilter, TxList};
pub use error::{MultisigError, RejectionKind};
pub use query::Query;
pub use render::Renderer;
pub use write::{AlloySender, TxSender, WriteFlow, WritePhase};
