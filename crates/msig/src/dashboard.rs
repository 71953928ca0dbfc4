//! The dashboard widgets, assembled from contract reads.

use crate::{
    client::{MultisigReader, Result},
    query::Query,
    types::{
        AccountInfo, MultisigTransaction, Owner, TxActions, TxDetail, TxEntry, WalletStats,
    },
};
use alloy_primitives::{Address, U256};
use futures::future::{join_all, try_join_all};
use serde::Serialize;

/// Which transactions the list shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Executed,
}

/// Status filter and free text search of the transaction list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxFilter {
    pub status: StatusFilter,
    pub search: Option<String>,
}

impl TxFilter {
    pub fn new(status: StatusFilter, search: Option<String>) -> Self {
        Self { status, search }
    }

    /// Pending hides executed transactions and vice versa. The search term matches, case
    /// insensitively, a substring of the decimal id or of the recipient address. The term is
    /// used as typed, surrounding whitespace included.
    pub fn matches(&self, tx: &MultisigTransaction) -> bool {
        match self.status {
            StatusFilter::Pending if tx.executed => return false,
            StatusFilter::Executed if !tx.executed => return false,
            _ => {}
        }

        let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) else {
            return true;
        };
        let search = search.to_lowercase();
        tx.index.to_string().contains(&search) || format!("{:#x}", tx.to).contains(&search)
    }
}

/// The transaction list with its header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxList {
    pub total: U256,
    pub required_confirmations: U256,
    pub owner_count: U256,
    /// Whether the connected account is an owner, `None` without an account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_owner: Option<bool>,
    /// Rows in ascending id order. Rows whose read failed are kept regardless of the filter.
    pub rows: Vec<Query<TxEntry>>,
}

impl TxList {
    /// An account is connected but is not an owner: it can view but not act.
    pub fn is_viewer_only(&self) -> bool {
        self.is_owner == Some(false)
    }
}

/// Everything `status` and `watch` render, each part settled independently.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub stats: WalletStats,
    pub account: Query<Option<AccountInfo>>,
    pub owners: Query<Vec<Owner>>,
    pub transactions: Query<TxList>,
}

/// Reads the widgets of one multisig wallet, from the point of view of an optional account.
#[derive(Debug)]
pub struct Dashboard<R> {
    reader: R,
    account: Option<Address>,
}

impl<R: MultisigReader> Dashboard<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, account: None }
    }

    /// Sets the connected account.
    pub fn with_account(mut self, account: Option<Address>) -> Self {
        self.account = account;
        self
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Balance, owner count, threshold and transaction count of the wallet. A failed read only
    /// fails its own card.
    pub async fn stats(&self) -> WalletStats {
        let address = self.reader.address();
        let (balance, owner_count, required_confirmations, transaction_count) = futures::join!(
            Query::fetch(self.reader.balance(address)),
            Query::fetch(self.reader.owner_count()),
            Query::fetch(self.reader.required_confirmations()),
            Query::fetch(self.reader.transaction_count()),
        );
        WalletStats { address, balance, owner_count, required_confirmations, transaction_count }
    }

    /// The owners in contract order, the connected account marked.
    pub async fn owners(&self) -> Result<Vec<Owner>> {
        let count = self.reader.owner_count().await?.saturating_to::<u64>();
        let addresses = try_join_all((0..count).map(|i| self.reader.owner(i))).await?;
        Ok(addresses
            .into_iter()
            .zip(0..)
            .map(|(address, index)| Owner {
                index,
                address,
                is_current_account: self.account == Some(address),
            })
            .collect())
    }

    /// The transaction list, filtered.
    pub async fn transactions(&self, filter: &TxFilter) -> Result<TxList> {
        let (total, required_confirmations, owner_count, is_owner) = futures::try_join!(
            self.reader.transaction_count(),
            self.reader.required_confirmations(),
            self.reader.owner_count(),
            self.is_owner(),
        )?;

        let count = total.saturating_to::<u64>();
        let rows = join_all(
            (0..count).map(|index| Query::fetch(self.entry(index, required_confirmations, is_owner))),
        )
        .await
        .into_iter()
        .filter(|row| row.ready().is_none_or(|entry| filter.matches(&entry.tx)))
        .collect();

        Ok(TxList { total, required_confirmations, owner_count, is_owner, rows })
    }

    /// A single transaction with the owners that confirmed it.
    pub async fn transaction_detail(&self, index: u64) -> Result<TxDetail> {
        let (required_confirmations, owners, is_owner) = futures::try_join!(
            self.reader.required_confirmations(),
            self.owners(),
            self.is_owner(),
        )?;
        let (entry, confirmed) = futures::try_join!(
            self.entry(index, required_confirmations, is_owner),
            try_join_all(owners.iter().map(|owner| self.reader.is_confirmed(index, owner.address))),
        )?;
        let confirmed_by = owners
            .into_iter()
            .zip(confirmed)
            .filter_map(|(owner, confirmed)| confirmed.then_some(owner.address))
            .collect();
        Ok(TxDetail { entry, required_confirmations, confirmed_by })
    }

    /// The connected account panel, `None` without an account.
    pub async fn account(&self) -> Result<Option<AccountInfo>> {
        let Some(address) = self.account else { return Ok(None) };
        let (balance, is_owner) =
            futures::try_join!(self.reader.balance(address), self.reader.is_owner(address))?;
        Ok(Some(AccountInfo { address, balance, is_owner }))
    }

    /// Reads all widgets concurrently. A failing widget does not affect the others.
    pub async fn snapshot(&self, filter: &TxFilter) -> Snapshot {
        let (stats, account, owners, transactions) = futures::join!(
            self.stats(),
            Query::fetch(self.account()),
            Query::fetch(self.owners()),
            Query::fetch(self.transactions(filter)),
        );
        Snapshot { stats, account, owners, transactions }
    }

    async fn is_owner(&self) -> Result<Option<bool>> {
        match self.account {
            Some(account) => self.reader.is_owner(account).await.map(Some),
            None => Ok(None),
        }
    }

    async fn entry(&self, index: u64, required: U256, is_owner: Option<bool>) -> Result<TxEntry> {
        let confirmed = async {
            match self.account {
                Some(account) => self.reader.is_confirmed(index, account).await.map(Some),
                None => Ok(None),
            }
        };
        let (tx, confirmed_by_account) =
            futures::try_join!(self.reader.transaction(index), confirmed)?;
        let actions = TxActions::for_account(
            &tx,
            required,
            is_owner.unwrap_or_default(),
            confirmed_by_account.unwrap_or_default(),
        );
        Ok(TxEntry { status: tx.status(), tx, confirmed_by_account, actions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::FakeReader;
    use alloy_primitives::Bytes;

    fn tx(index: u64, to: Address, executed: bool) -> MultisigTransaction {
        MultisigTransaction {
            index,
            to,
            value: U256::ZERO,
            data: Bytes::new(),
            executed,
            num_confirmations: U256::ZERO,
        }
    }

    #[test]
    fn status_filter() {
        let pending = tx(0, Address::ZERO, false);
        let executed = tx(1, Address::ZERO, true);

        let filter = TxFilter::new(StatusFilter::Pending, None);
        assert!(filter.matches(&pending));
        assert!(!filter.matches(&executed));

        let filter = TxFilter::new(StatusFilter::Executed, None);
        assert!(!filter.matches(&pending));
        assert!(filter.matches(&executed));

        let filter = TxFilter::default();
        assert!(filter.matches(&pending) && filter.matches(&executed));
    }

    #[test]
    fn search_matches_id_or_recipient() {
        let to: Address = "0x3886eC7a6ca3841944a27439126096d6978f8884".parse().unwrap();
        let entry = tx(12, to, false);

        for term in ["12", "1", "3886EC7A", "0x3886ec", "f8884", ""] {
            assert!(TxFilter::new(StatusFilter::All, Some(term.into())).matches(&entry), "{term}");
        }
        for term in ["13", "0x0000", "zz", " 12", "8884 ", " "] {
            assert!(!TxFilter::new(StatusFilter::All, Some(term.into())).matches(&entry), "{term}");
        }
    }

    #[tokio::test]
    async fn stats_from_reads() {
        let dashboard = Dashboard::new(FakeReader::sample());
        let stats = dashboard.stats().await;
        assert_eq!(stats.owner_count, Query::Ready(U256::from(3)));
        assert_eq!(stats.required_confirmations, Query::Ready(U256::from(2)));
        assert_eq!(stats.transaction_count, Query::Ready(U256::from(2)));
        assert_eq!(stats.balance, Query::Ready(U256::from(5) * U256::from(10u64.pow(17))));
        assert_eq!(stats.approval_threshold_percent(), Some(67));
    }

    #[tokio::test]
    async fn failed_balance_only_fails_its_card() {
        let mut reader = FakeReader::sample();
        reader.unreadable_balances.insert(reader.address);
        let snapshot = Dashboard::new(reader).snapshot(&TxFilter::default()).await;
        let stats = snapshot.stats;
        assert!(stats.balance.error().is_some());
        assert_eq!(stats.owner_count, Query::Ready(U256::from(3)));
        assert_eq!(stats.required_confirmations, Query::Ready(U256::from(2)));
        assert_eq!(stats.transaction_count, Query::Ready(U256::from(2)));
        assert_eq!(stats.approval_threshold_percent(), Some(67));
        assert!(snapshot.transactions.is_ready());
    }

    #[tokio::test]
    async fn owners_mark_current_account() {
        let dashboard =
            Dashboard::new(FakeReader::sample()).with_account(Some(Address::repeat_byte(2)));
        let owners = dashboard.owners().await.unwrap();
        assert_eq!(owners.len(), 3);
        assert_eq!(owners.iter().filter(|o| o.is_current_account).count(), 1);
        assert!(owners[1].is_current_account);
        assert_eq!(owners[2].index, 2);
    }

    #[tokio::test]
    async fn transactions_with_actions() {
        let owner = Address::repeat_byte(2);
        let dashboard = Dashboard::new(FakeReader::sample()).with_account(Some(owner));
        let list = dashboard.transactions(&TxFilter::default()).await.unwrap();
        assert_eq!(list.total, U256::from(2));
        assert_eq!(list.is_owner, Some(true));
        assert_eq!(list.rows.len(), 2);

        let pending = list.rows[0].ready().unwrap();
        assert_eq!(pending.confirmed_by_account, Some(false));
        assert_eq!(
            pending.actions,
            TxActions { can_confirm: true, can_revoke: false, can_execute: false }
        );

        let executed = list.rows[1].ready().unwrap();
        assert!(!executed.actions.any());

        let list = dashboard
            .transactions(&TxFilter::new(StatusFilter::Executed, None))
            .await
            .unwrap();
        assert_eq!(list.rows.len(), 1);
        assert_eq!(list.rows[0].ready().unwrap().tx.index, 1);
    }

    #[tokio::test]
    async fn viewer_without_ownership() {
        let dashboard =
            Dashboard::new(FakeReader::sample()).with_account(Some(Address::repeat_byte(9)));
        let list = dashboard.transactions(&TxFilter::default()).await.unwrap();
        assert!(list.is_viewer_only());
        assert!(list.rows.iter().filter_map(Query::ready).all(|row| !row.actions.any()));

        let without_account = Dashboard::new(FakeReader::sample());
        let list = without_account.transactions(&TxFilter::default()).await.unwrap();
        assert!(!list.is_viewer_only());
        assert_eq!(list.rows[0].ready().unwrap().confirmed_by_account, None);
    }

    #[tokio::test]
    async fn failed_rows_are_kept() {
        let mut reader = FakeReader::sample();
        reader.failing.insert(1);
        let dashboard = Dashboard::new(reader);
        let list = dashboard
            .transactions(&TxFilter::new(StatusFilter::Pending, Some("0".into())))
            .await
            .unwrap();
        assert_eq!(list.rows.len(), 2);
        assert!(list.rows[1].error().is_some());
    }

    #[tokio::test]
    async fn detail_lists_confirming_owners() {
        let dashboard =
            Dashboard::new(FakeReader::sample()).with_account(Some(Address::repeat_byte(1)));
        let detail = dashboard.transaction_detail(1).await.unwrap();
        assert_eq!(detail.confirmed_by, vec![Address::repeat_byte(1), Address::repeat_byte(2)]);
        assert_eq!(detail.required_confirmations, U256::from(2));
        assert_eq!(detail.entry.tx.data, Bytes::from_static(&[0xde, 0xad]));

        let detail = dashboard.transaction_detail(0).await.unwrap();
        assert_eq!(detail.confirmed_by, vec![Address::repeat_byte(1)]);
        assert!(detail.entry.actions.can_revoke);

        assert!(dashboard.transaction_detail(7).await.is_err());
    }

    #[tokio::test]
    async fn account_panel() {
        let dashboard = Dashboard::new(FakeReader::sample());
        assert_eq!(dashboard.account().await.unwrap(), None);

        let dashboard = dashboard.with_account(Some(Address::repeat_byte(1)));
        let account = dashboard.account().await.unwrap().unwrap();
        assert!(account.is_owner);
        assert_eq!(account.balance, U256::from(10u64.pow(18)));
    }

    #[tokio::test]
    async fn snapshot_settles_every_part() {
        let dashboard = Dashboard::new(FakeReader::sample());
        let snapshot = dashboard.snapshot(&TxFilter::default()).await;
        assert!(snapshot.stats.balance.is_ready());
        assert!(snapshot.owners.is_ready());
        assert!(snapshot.transactions.is_ready());
        assert_eq!(snapshot.account, Query::Ready(None));
    }
}
