//! The dashboard's view of the contract state.

use crate::query::Query;
use alloy_primitives::{Address, Bytes, U256};
use msig_common::fmt::{progress_percent, threshold_percent};
use serde::Serialize;
use std::fmt;

/// A transaction record as returned by `getTransaction`. Never mutated locally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigTransaction {
    pub index: u64,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub executed: bool,
    pub num_confirmations: U256,
}

impl MultisigTransaction {
    pub fn status(&self) -> TxStatus {
        if self.executed { TxStatus::Executed } else { TxStatus::Pending }
    }

    /// Share of the threshold reached, capped at 100.
    pub fn progress(&self, required: U256) -> u8 {
        progress_percent(self.num_confirmations, required)
    }

    /// Whether the threshold is reached and the transaction is still pending.
    pub fn is_executable(&self, required: U256) -> bool {
        !self.executed && self.num_confirmations >= required
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Executed,
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "Pending",
            Self::Executed => "Executed",
        })
    }
}

/// An entry of the `owners` array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub index: u64,
    pub address: Address,
    /// Whether this owner is the connected account.
    pub is_current_account: bool,
}

/// The stats cards. Every card is its own read and settles on its own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStats {
    pub address: Address,
    pub balance: Query<U256>,
    pub owner_count: Query<U256>,
    pub required_confirmations: Query<U256>,
    pub transaction_count: Query<U256>,
}

impl WalletStats {
    /// `required / owners` as a rounded percentage, 0 when either is 0. `None` until both reads
    /// succeeded.
    pub fn approval_threshold_percent(&self) -> Option<u64> {
        let required = self.required_confirmations.ready()?;
        let owners = self.owner_count.ready()?;
        Some(threshold_percent(*required, *owners))
    }
}

/// The connected account panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub address: Address,
    pub balance: U256,
    pub is_owner: bool,
}

/// The actions offered to the connected account for one transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxActions {
    pub can_confirm: bool,
    pub can_revoke: bool,
    pub can_execute: bool,
}

impl TxActions {
    /// Owners may act on transactions that are not executed: confirm when they have not
    /// confirmed yet, revoke when they have, execute once the threshold is reached.
    pub fn for_account(
        tx: &MultisigTransaction,
        required: U256,
        is_owner: bool,
        has_confirmed: bool,
    ) -> Self {
        if !is_owner || tx.executed {
            return Self::default();
        }
        Self {
            can_confirm: !has_confirmed,
            can_revoke: has_confirmed,
            can_execute: tx.is_executable(required),
        }
    }

    /// Whether any action is offered.
    pub fn any(&self) -> bool {
        self.can_confirm || self.can_revoke || self.can_execute
    }

    /// Labels of the offered actions.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::with_capacity(2);
        if self.can_confirm {
            labels.push("Approve");
        }
        if self.can_revoke {
            labels.push("Revoke");
        }
        if self.can_execute {
            labels.push("Execute");
        }
        labels
    }
}

/// A row of the transaction list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxEntry {
    #[serde(flatten)]
    pub tx: MultisigTransaction,
    pub status: TxStatus,
    /// Whether the connected account confirmed, `None` without an account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_by_account: Option<bool>,
    pub actions: TxActions,
}

/// The transaction detail view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxDetail {
    #[serde(flatten)]
    pub entry: TxEntry,
    pub required_confirmations: U256,
    /// Owners that confirmed, in owner order.
    pub confirmed_by: Vec<Address>,
}
