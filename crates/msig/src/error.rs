//! Errors surfaced by the dashboard.

use serde::{Serialize, Serializer};
use std::fmt;

/// Why a state-changing call did not go through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// The account cannot pay for value and gas.
    InsufficientFunds,
    /// The signature was refused, e.g. an aborted password prompt.
    UserCancelled,
    /// The contract reverted, either in the gas estimation or on chain.
    Reverted,
    /// Anything else the node or the signer reported.
    Other,
}

impl RejectionKind {
    /// Classifies an error message from the node or the signer.
    pub fn classify(message: &str) -> Self {
        let message = message.to_lowercase();
        if message.contains("insufficient funds") || message.contains("insufficient balance") {
            Self::InsufficientFunds
        } else if ["user rejected", "user denied", "cancelled", "canceled", "interrupted"]
            .iter()
            .any(|needle| message.contains(needle))
        {
            Self::UserCancelled
        } else if message.contains("revert") {
            Self::Reverted
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InsufficientFunds => "insufficient funds for gas and value",
            Self::UserCancelled => "transaction cancelled",
            Self::Reverted => "transaction reverted",
            Self::Other => "transaction failed",
        })
    }
}

/// Errors of the read and write paths.
///
/// Every variant renders as a single line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MultisigError {
    #[error("wallet not connected")]
    WalletNotConnected,
    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),
    #[error("invalid hex data: {0}")]
    InvalidHexData(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("{0}: {1}")]
    Rejected(RejectionKind, String),
    #[error("failed to read {what}: {reason}")]
    Read { what: String, reason: String },
    #[error("the RPC endpoint is on chain {actual}, but the multisig is configured for {name} ({expected})")]
    WrongChain { actual: u64, expected: u64, name: String },
}

impl MultisigError {
    /// A rejection, classified by its message.
    pub fn rejected(err: impl fmt::Display) -> Self {
        let message = err.to_string();
        Self::Rejected(RejectionKind::classify(&message), message)
    }

    /// A failed read of `what`.
    pub fn read(what: impl Into<String>, err: impl fmt::Display) -> Self {
        Self::Read { what: what.into(), reason: err.to_string() }
    }

    /// The rejection kind, if this is a rejection.
    pub fn rejection_kind(&self) -> Option<RejectionKind> {
        match self {
            Self::Rejected(kind, _) => Some(*kind),
            _ => None,
        }
    }
}

/// What the user can do about a [`MultisigError`] anywhere in an error chain.
pub fn hint(error: &(dyn std::error::Error + 'static)) -> Option<&'static str> {
    error.downcast_ref::<MultisigError>()?.hint()
}

impl MultisigError {
    /// What the user can do about this error.
    pub fn hint(&self) -> Option<&'static str> {
        Some(match self {
            Self::WalletNotConnected => {
                "pass --private-key, --mnemonic, --keystore, --account or --interactive to sign"
            }
            Self::InvalidRecipient(_) => "the recipient must be a 0x-prefixed 20 byte hex address",
            Self::InvalidHexData(_) => "calldata must be 0x-prefixed hex with an even length",
            Self::InvalidAmount(_) => "the amount is in the native currency, e.g. `0.01`",
            Self::Rejected(RejectionKind::InsufficientFunds, _) => {
                "the signing account pays the gas; fund it and retry"
            }
            Self::Rejected(RejectionKind::Reverted, _) => {
                "only owners may act, and a transaction can be confirmed once per owner and \
                 executed once; `msig tx <ID>` shows its state"
            }
            Self::Rejected(RejectionKind::UserCancelled | RejectionKind::Other, _) => return None,
            Self::Read { .. } => "check --rpc-url, or raise `read_retries` in msig.toml",
            Self::WrongChain { .. } => "pass the --chain the endpoint serves, or its --rpc-url",
        })
    }
}

impl Serialize for MultisigError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
