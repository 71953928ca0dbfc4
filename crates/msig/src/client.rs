//! Read access to the multisig wallet contract.

use crate::{
    binding::IMultiSigWallet::{self, IMultiSigWalletInstance},
    error::MultisigError,
    types::MultisigTransaction,
};
use alloy_network::AnyNetwork;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use async_trait::async_trait;
use msig_common::{Retry, RetryProvider};
use std::{fmt::Display, future::Future};

pub type Result<T, E = MultisigError> = std::result::Result<T, E>;

/// The read-only calls the dashboard is built from.
///
/// Reads are independent of each other; callers issue them concurrently.
#[async_trait]
pub trait MultisigReader: Send + Sync {
    /// Address of the multisig wallet contract.
    fn address(&self) -> Address;

    async fn transaction_count(&self) -> Result<U256>;

    async fn owner_count(&self) -> Result<U256>;

    /// The owner at `index` of the `owners` array.
    async fn owner(&self, index: u64) -> Result<Address>;

    async fn is_owner(&self, account: Address) -> Result<bool>;

    /// Whether `owner` confirmed the transaction at `index`.
    async fn is_confirmed(&self, index: u64, owner: Address) -> Result<bool>;

    async fn required_confirmations(&self) -> Result<U256>;

    async fn transaction(&self, index: u64) -> Result<MultisigTransaction>;

    /// Native balance of `account`.
    async fn balance(&self, account: Address) -> Result<U256>;

    async fn chain_id(&self) -> Result<u64>;
}

/// [`MultisigReader`] backed by an RPC provider.
///
/// Each read is retried according to its [`Retry`], once after one second by default.
#[derive(Clone, Debug)]
pub struct MultisigClient<P = RetryProvider> {
    contract: IMultiSigWalletInstance<P, AnyNetwork>,
    retry: Retry,
}

impl<P: Provider<AnyNetwork>> MultisigClient<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self { contract: IMultiSigWallet::new(address, provider), retry: Retry::default() }
    }

    /// Sets the retry applied to every read.
    pub fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = retry;
        self
    }

    pub fn provider(&self) -> &P {
        self.contract.provider()
    }

    async fn read<T, F, Fut, E>(&self, what: impl FnOnce() -> String, f: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.retry.run_async(f).await.map_err(|err| MultisigError::read(what(), err))
    }
}

#[async_trait]
impl<P: Provider<AnyNetwork> + 'static> MultisigReader for MultisigClient<P> {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn transaction_count(&self) -> Result<U256> {
        let contract = &self.contract;
        self.read(
            || "transaction count".to_string(),
            || async move { contract.getTransactionCount().call().await },
        )
        .await
    }

    async fn owner_count(&self) -> Result<U256> {
        let contract = &self.contract;
        self.read(
            || "owner count".to_string(),
            || async move { contract.getOwnerCount().call().await },
        )
        .await
    }

    async fn owner(&self, index: u64) -> Result<Address> {
        let contract = &self.contract;
        self.read(
            || format!("owner {index}"),
            || async move { contract.owners(U256::from(index)).call().await },
        )
        .await
    }

    async fn is_owner(&self, account: Address) -> Result<bool> {
        let contract = &self.contract;
        self.read(
            || format!("owner status of {account}"),
            || async move { contract.isOwner(account).call().await },
        )
        .await
    }

    async fn is_confirmed(&self, index: u64, owner: Address) -> Result<bool> {
        let contract = &self.contract;
        self.read(
            || format!("confirmation of transaction {index} by {owner}"),
            || async move { contract.isConfirmed(U256::from(index), owner).call().await },
        )
        .await
    }

    async fn required_confirmations(&self) -> Result<U256> {
        let contract = &self.contract;
        self.read(
            || "required confirmations".to_string(),
            || async move { contract.requiredConfirmations().call().await },
        )
        .await
    }

    async fn transaction(&self, index: u64) -> Result<MultisigTransaction> {
        let contract = &self.contract;
        let tx = self
            .read(
                || format!("transaction {index}"),
                || async move { contract.getTransaction(U256::from(index)).call().await },
            )
            .await?;
        Ok(MultisigTransaction {
            index,
            to: tx.to,
            value: tx.value,
            data: tx.data,
            executed: tx.executed,
            num_confirmations: tx.numConfirmations,
        })
    }

    async fn balance(&self, account: Address) -> Result<U256> {
        let provider = self.provider();
        self.read(
            || format!("balance of {account}"),
            || async move { provider.get_balance(account).await },
        )
        .await
    }

    async fn chain_id(&self) -> Result<u64> {
        let provider = self.provider();
        self.read(|| "chain id".to_string(), || async move { provider.get_chain_id().await })
            .await
    }
}
