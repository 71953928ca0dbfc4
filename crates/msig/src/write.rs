//! State-changing calls: signing, inclusion and the phases in between.

use crate::{
    binding::MultisigCall,
    client::MultisigReader,
    dashboard::Dashboard,
    error::{MultisigError, RejectionKind},
    types::TxDetail,
};
use alloy_network::{
    AnyNetwork, EthereumWallet, Network, ReceiptResponse, TransactionBuilder, TxSigner,
};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{PendingTransactionBuilder, Provider, ProviderBuilder};
use async_trait::async_trait;
use msig_common::{
    RetryProvider, sh_verbose,
    units::parse_native,
    validate::{normalize_hex_data, parse_address},
};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;

type AnyTxRequest = <AnyNetwork as Network>::TransactionRequest;

/// The outcome of an included transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSummary {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
}

impl ReceiptSummary {
    pub fn from_receipt<R: ReceiptResponse>(receipt: &R) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
            success: receipt.status(),
        }
    }
}

/// Where a write is at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WritePhase {
    #[default]
    Idle,
    /// The signer is filling and signing the transaction.
    AwaitingSignature,
    /// Broadcast, waiting for the receipt.
    AwaitingInclusion(TxHash),
    /// Included and successful.
    Confirmed(ReceiptSummary),
    Failed(MultisigError),
}

impl WritePhase {
    /// Whether the write settled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Failed(_))
    }
}

/// Signs, broadcasts and awaits multisig calls.
#[async_trait]
pub trait TxSender: Send + Sync {
    /// The signing account.
    fn from(&self) -> Address;

    /// Signs and broadcasts `call`, returning its hash.
    async fn send(&self, call: &MultisigCall) -> Result<TxHash, MultisigError>;

    /// Waits for the receipt of `tx_hash`.
    async fn wait(&self, tx_hash: TxHash) -> Result<ReceiptSummary, MultisigError>;
}

/// Drives a single call through its phases and publishes every transition.
///
/// A write is never retried; a rejected or reverted call settles as [`WritePhase::Failed`].
#[derive(Debug)]
pub struct WriteFlow<S> {
    sender: S,
    phase: watch::Sender<WritePhase>,
}

impl<S: TxSender> WriteFlow<S> {
    pub fn new(sender: S) -> Self {
        Self { sender, phase: watch::Sender::new(WritePhase::Idle) }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Receives every phase published from now on.
    pub fn subscribe(&self) -> watch::Receiver<WritePhase> {
        self.phase.subscribe()
    }

    /// The current phase.
    pub fn phase(&self) -> WritePhase {
        self.phase.borrow().clone()
    }

    /// Sends `call` and waits for its receipt.
    pub async fn run(&self, call: &MultisigCall) -> Result<ReceiptSummary, MultisigError> {
        let tx_hash = self.submit(call).await?;

        let res = match self.sender.wait(tx_hash).await {
            Ok(receipt) if receipt.success => Ok(receipt),
            Ok(receipt) => Err(MultisigError::Rejected(
                RejectionKind::Reverted,
                match receipt.block_number {
                    Some(block) => format!("{tx_hash} failed in block {block}"),
                    None => format!("{tx_hash} failed"),
                },
            )),
            Err(err) => Err(err),
        };
        self.settle(res)
    }

    /// Sends `call` without waiting for inclusion.
    pub async fn submit(&self, call: &MultisigCall) -> Result<TxHash, MultisigError> {
        debug!(%call, from = %self.sender.from(), "sending");
        self.publish(WritePhase::AwaitingSignature);
        let tx_hash = self.sender.send(call).await.map_err(|err| self.fail(err))?;
        self.publish(WritePhase::AwaitingInclusion(tx_hash));
        Ok(tx_hash)
    }

    fn settle(
        &self,
        res: Result<ReceiptSummary, MultisigError>,
    ) -> Result<ReceiptSummary, MultisigError> {
        match res {
            Ok(receipt) => {
                self.publish(WritePhase::Confirmed(receipt.clone()));
                Ok(receipt)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&self, err: MultisigError) -> MultisigError {
        warn!(%err, "write failed");
        self.publish(WritePhase::Failed(err.clone()));
        err
    }

    fn publish(&self, phase: WritePhase) {
        trace!(?phase, "write phase");
        self.phase.send_replace(phase);
    }
}

/// Validates the inputs of a new submission.
///
/// The recipient must be a well formed address, the amount a decimal number of native units and
/// the data, if any, hex encoded.
pub fn submit_call(
    to: &str,
    amount: &str,
    data: Option<&str>,
) -> Result<MultisigCall, MultisigError> {
    let to = parse_address(to).map_err(|err| MultisigError::InvalidRecipient(err.to_string()))?;
    let value = parse_native(amount).map_err(|err| MultisigError::InvalidAmount(err.to_string()))?;
    let data = normalize_hex_data(data.unwrap_or_default())
        .map_err(|err| MultisigError::InvalidHexData(err.to_string()))?;
    Ok(MultisigCall::Submit { to, value, data })
}

/// Fails unless the node at the other end of the provider serves the configured network. A
/// signed transaction carries its chain id, so a mismatch would be rejected anyway.
pub fn ensure_chain(chain_id: u64, network: &msig_config::Network) -> Result<(), MultisigError> {
    if chain_id == network.chain_id() {
        return Ok(());
    }
    Err(MultisigError::WrongChain {
        actual: chain_id,
        expected: network.chain_id(),
        name: network.name.clone(),
    })
}

/// Waits `delay` and re-reads the transaction affected by `call`; for a submission that is the
/// newest transaction.
pub async fn refetch_affected<R: MultisigReader>(
    dashboard: &Dashboard<R>,
    call: &MultisigCall,
    delay: Duration,
) -> Result<TxDetail, MultisigError> {
    tokio::time::sleep(delay).await;
    let index = match call.index() {
        Some(index) => index,
        None => {
            let count = dashboard.reader().transaction_count().await?.saturating_to::<u64>();
            count.checked_sub(1).ok_or_else(|| {
                MultisigError::read("submitted transaction", "the wallet has no transactions")
            })?
        }
    };
    dashboard.transaction_detail(index).await
}

/// [`TxSender`] signing with a local wallet and broadcasting through an RPC provider.
///
/// Nonce, gas limit, fees and chain id are filled before signing; networks without EIP-1559
/// get a legacy gas price.
#[derive(Clone)]
pub struct AlloySender {
    provider: RetryProvider,
    wallet: EthereumWallet,
    from: Address,
    multisig: Address,
    chain_id: u64,
    legacy: bool,
    confirmations: u64,
    timeout: Duration,
}

impl AlloySender {
    pub fn new(
        provider: RetryProvider,
        wallet: EthereumWallet,
        multisig: Address,
        chain_id: u64,
    ) -> Self {
        let from = wallet.default_signer().address();
        Self {
            provider,
            wallet,
            from,
            multisig,
            chain_id,
            legacy: false,
            confirmations: 1,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    /// Block confirmations awaited for the receipt.
    pub fn confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    /// How long to wait for the receipt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn build_tx(&self, call: &MultisigCall) -> eyre::Result<AnyTxRequest> {
        let mut tx = AnyTxRequest::default()
            .with_from(self.from)
            .with_to(self.multisig)
            .with_input(call.calldata())
            .with_value(U256::ZERO)
            .with_chain_id(self.chain_id);

        let nonce = self.provider.get_transaction_count(self.from).await?;
        tx.set_nonce(nonce);

        if self.legacy {
            let gas_price = self.provider.get_gas_price().await?;
            tx.set_gas_price(gas_price);
            let _ = sh_verbose!(
                "{} from {} with nonce {nonce}, gas price {gas_price} wei",
                call.label(),
                self.from
            );
        } else {
            let estimate = self.provider.estimate_eip1559_fees().await?;
            tx.set_max_fee_per_gas(estimate.max_fee_per_gas);
            tx.set_max_priority_fee_per_gas(estimate.max_priority_fee_per_gas);
            let _ = sh_verbose!(
                "{} from {} with nonce {nonce}, max fee {} wei, priority fee {} wei",
                call.label(),
                self.from,
                estimate.max_fee_per_gas,
                estimate.max_priority_fee_per_gas
            );
        }

        let gas = self.provider.estimate_gas(tx.clone()).await?;
        tx.set_gas_limit(gas);
        let _ = sh_verbose!("estimated gas: {gas}");
        Ok(tx)
    }
}

#[async_trait]
impl TxSender for AlloySender {
    fn from(&self) -> Address {
        self.from
    }

    async fn send(&self, call: &MultisigCall) -> Result<TxHash, MultisigError> {
        let tx = self.build_tx(call).await.map_err(|err| {
            MultisigError::rejected(msig_common::errors::display_chain(&err))
        })?;
        trace!(?tx, "built transaction");

        let provider = ProviderBuilder::<_, _, AnyNetwork>::default()
            .wallet(self.wallet.clone())
            .connect_provider(self.provider.clone());
        let pending = provider.send_transaction(tx).await.map_err(MultisigError::rejected)?;
        Ok(*pending.tx_hash())
    }

    async fn wait(&self, tx_hash: TxHash) -> Result<ReceiptSummary, MultisigError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations)
            .with_timeout(Some(self.timeout))
            .get_receipt()
            .await
            .map_err(MultisigError::rejected)?;
        Ok(ReceiptSummary::from_receipt(&receipt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::FakeReader;
    use alloy_primitives::{B256, Bytes, U64, U128, b256};
    use alloy_provider::mock::Asserter;
    use msig_config::Network as Preset;
    use msig_wallets::WalletSigner;
    use std::sync::Mutex;

    const HASH: TxHash = b256!("0x1111111111111111111111111111111111111111111111111111111111111111");

    struct FakeSender {
        send: Result<TxHash, MultisigError>,
        receipt: Result<ReceiptSummary, MultisigError>,
        sent: Mutex<Vec<MultisigCall>>,
    }

    impl FakeSender {
        fn new(
            send: Result<TxHash, MultisigError>,
            receipt: Result<ReceiptSummary, MultisigError>,
        ) -> Self {
            Self { send, receipt, sent: Mutex::default() }
        }
    }

    fn receipt(success: bool) -> ReceiptSummary {
        ReceiptSummary {
            transaction_hash: HASH,
            block_number: Some(7),
            gas_used: 48_000,
            success,
        }
    }

    #[async_trait]
    impl TxSender for FakeSender {
        fn from(&self) -> Address {
            Address::repeat_byte(1)
        }

        async fn send(&self, call: &MultisigCall) -> Result<TxHash, MultisigError> {
            self.sent.lock().unwrap().push(call.clone());
            self.send.clone()
        }

        async fn wait(&self, _tx_hash: TxHash) -> Result<ReceiptSummary, MultisigError> {
            self.receipt.clone()
        }
    }

    /// Collects every phase the flow publishes while `run` executes.
    async fn phases(flow: &WriteFlow<FakeSender>, call: MultisigCall) -> Vec<WritePhase> {
        let mut rx = flow.subscribe();
        let collect = async {
            let mut seen = Vec::new();
            while rx.changed().await.is_ok() {
                let phase = rx.borrow_and_update().clone();
                let done = phase.is_terminal();
                seen.push(phase);
                if done {
                    break;
                }
            }
            seen
        };
        let (_, seen) = tokio::join!(flow.run(&call), collect);
        seen
    }

    #[tokio::test]
    async fn confirmed_sequence() {
        let flow = WriteFlow::new(FakeSender::new(Ok(HASH), Ok(receipt(true))));
        let seen = phases(&flow, MultisigCall::Confirm(0)).await;
        assert_eq!(seen.last(), Some(&WritePhase::Confirmed(receipt(true))));
        assert_eq!(flow.phase(), WritePhase::Confirmed(receipt(true)));
        assert_eq!(*flow.sender().sent.lock().unwrap(), [MultisigCall::Confirm(0)]);
    }

    #[tokio::test]
    async fn run_publishes_each_phase() {
        let flow = WriteFlow::new(FakeSender::new(Ok(HASH), Ok(receipt(true))));
        assert_eq!(flow.phase(), WritePhase::Idle);

        let hash = flow.submit(&MultisigCall::Execute(1)).await.unwrap();
        assert_eq!(hash, HASH);
        assert_eq!(flow.phase(), WritePhase::AwaitingInclusion(HASH));

        let receipt = flow.run(&MultisigCall::Execute(1)).await.unwrap();
        assert!(receipt.success);
        assert!(flow.phase().is_terminal());
    }

    #[tokio::test]
    async fn reverted_receipt_fails() {
        let flow = WriteFlow::new(FakeSender::new(Ok(HASH), Ok(receipt(false))));
        let err = flow.run(&MultisigCall::Execute(0)).await.unwrap_err();
        assert_eq!(err.rejection_kind(), Some(RejectionKind::Reverted));
        assert!(err.to_string().contains("failed in block 7"), "{err}");
        assert_eq!(flow.phase(), WritePhase::Failed(err));
    }

    #[tokio::test]
    async fn rejected_send_never_waits() {
        let rejection = MultisigError::rejected("insufficient funds for gas * price + value");
        let flow = WriteFlow::new(FakeSender::new(Err(rejection.clone()), Ok(receipt(true))));
        let seen = phases(&flow, MultisigCall::Revoke(0)).await;
        assert_eq!(seen.last(), Some(&WritePhase::Failed(rejection.clone())));
        assert!(!seen.iter().any(|phase| matches!(phase, WritePhase::AwaitingInclusion(_))));
        assert_eq!(rejection.rejection_kind(), Some(RejectionKind::InsufficientFunds));
    }

    #[test]
    fn validates_submission() {
        let call = submit_call("0x3886eC7a6ca3841944a27439126096d6978f8884", "0.5", None).unwrap();
        let MultisigCall::Submit { to, value, data } = call else { panic!("expected submit") };
        assert_eq!(to, "0x3886eC7a6ca3841944a27439126096d6978f8884".parse::<Address>().unwrap());
        assert_eq!(value, U256::from(5) * U256::from(10u64.pow(17)));
        assert_eq!(data, Bytes::new());

        let call = submit_call("0x3886ec7a6ca3841944a27439126096d6978f8884", "1", Some("0xdeadbeef"));
        assert!(matches!(call, Ok(MultisigCall::Submit { data, .. }) if data.len() == 4));

        assert!(matches!(
            submit_call("0x1234", "1", None),
            Err(MultisigError::InvalidRecipient(_))
        ));
        assert!(matches!(
            submit_call("0x3886ec7a6ca3841944a27439126096d6978f8884", "abc", None),
            Err(MultisigError::InvalidAmount(_))
        ));
        assert!(matches!(
            submit_call("0x3886ec7a6ca3841944a27439126096d6978f8884", "1", Some("0xzz")),
            Err(MultisigError::InvalidHexData(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn refetches_after_delay() {
        let dashboard = Dashboard::new(FakeReader::sample());
        let start = tokio::time::Instant::now();

        let detail =
            refetch_affected(&dashboard, &MultisigCall::Confirm(0), Duration::from_secs(1))
                .await
                .unwrap();
        assert_eq!(detail.entry.tx.index, 0);
        assert!(start.elapsed() >= Duration::from_secs(1));

        let submit = MultisigCall::Submit { to: Address::ZERO, value: U256::ZERO, data: Bytes::new() };
        let detail = refetch_affected(&dashboard, &submit, Duration::ZERO).await.unwrap();
        assert_eq!(detail.entry.tx.index, 1);
    }

    fn mocked_sender(asserter: &Asserter) -> AlloySender {
        let provider = ProviderBuilder::<_, _, AnyNetwork>::default()
            .connect_mocked_client(asserter.clone())
            .erased();
        let signer = WalletSigner::from_private_key(&B256::repeat_byte(1)).unwrap();
        AlloySender::new(provider, signer.into_wallet(), Address::repeat_byte(0x42), 31)
    }

    #[tokio::test]
    async fn legacy_sender_sets_gas_price() {
        let asserter = Asserter::new();
        // eth_getTransactionCount, eth_gasPrice, eth_estimateGas
        asserter.push_success(&U64::from(5));
        asserter.push_success(&U128::from(65_164_000u64));
        asserter.push_success(&U64::from(48_000));

        let sender = mocked_sender(&asserter).legacy(true);
        let tx = sender.build_tx(&MultisigCall::Confirm(3)).await.unwrap();
        assert_eq!(tx.nonce(), Some(5));
        assert_eq!(tx.chain_id(), Some(31));
        assert_eq!(tx.from(), Some(sender.from));
        assert_eq!(tx.to(), Some(Address::repeat_byte(0x42)));
        assert_eq!(tx.gas_price(), Some(65_164_000));
        assert_eq!(tx.max_fee_per_gas(), None);
        assert_eq!(tx.gas_limit(), Some(48_000));
        assert!(asserter.read_q().is_empty());
    }

    #[tokio::test]
    async fn eip1559_sender_sets_fee_caps() {
        let asserter = Asserter::new();
        // eth_getTransactionCount, eth_feeHistory, eth_estimateGas
        asserter.push_success(&U64::ZERO);
        asserter.push_success(&serde_json::json!({
            "oldestBlock": "0x1",
            "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
            "gasUsedRatio": [0.5],
            "reward": [["0x3b9aca00"]]
        }));
        asserter.push_success(&U64::from(60_000));

        let tx = mocked_sender(&asserter).build_tx(&MultisigCall::Execute(1)).await.unwrap();
        assert_eq!(tx.nonce(), Some(0));
        assert_eq!(tx.gas_price(), None);
        assert!(tx.max_fee_per_gas().is_some_and(|fee| fee > 1_000_000_000), "{tx:?}");
        assert!(tx.max_priority_fee_per_gas().is_some());
        assert_eq!(tx.gas_limit(), Some(60_000));
    }

    #[tokio::test]
    async fn failed_nonce_read_rejects_send() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("insufficient funds for gas * price + value");
        let err = mocked_sender(&asserter).send(&MultisigCall::Revoke(0)).await.unwrap_err();
        assert_eq!(err.rejection_kind(), Some(RejectionKind::InsufficientFunds));
    }

    #[tokio::test]
    async fn status_false_receipt_fails_the_write() {
        let receipt: <AnyNetwork as Network>::ReceiptResponse =
            serde_json::from_value(serde_json::json!({
                "transactionHash": HASH,
                "transactionIndex": "0x0",
                "blockHash": B256::repeat_byte(2),
                "blockNumber": "0x2a",
                "from": Address::repeat_byte(1),
                "to": Address::repeat_byte(0x42),
                "gasUsed": "0xbb80",
                "effectiveGasPrice": "0x3b9aca00",
                "contractAddress": null,
                "type": "0x0",
                "status": "0x0",
                "cumulativeGasUsed": "0xbb80",
                "logs": [],
                "logsBloom": format!("0x{}", "00".repeat(256)),
            }))
            .unwrap();
        let summary = ReceiptSummary::from_receipt(&receipt);
        assert_eq!(
            summary,
            ReceiptSummary {
                transaction_hash: HASH,
                block_number: Some(42),
                gas_used: 48_000,
                success: false,
            }
        );

        let flow = WriteFlow::new(FakeSender::new(Ok(HASH), Ok(summary)));
        let err = flow.run(&MultisigCall::Execute(0)).await.unwrap_err();
        assert_eq!(err.rejection_kind(), Some(RejectionKind::Reverted));
        assert!(err.to_string().ends_with("failed in block 42"), "{err}");
    }

    #[test]
    fn chain_mismatch_is_refused() {
        let testnet = Preset::rootstock_testnet();
        assert_eq!(ensure_chain(31, &testnet), Ok(()));

        let err = ensure_chain(30, &testnet).unwrap_err();
        assert_eq!(
            err,
            MultisigError::WrongChain { actual: 30, expected: 31, name: testnet.name.clone() }
        );
        assert_eq!(
            err.to_string(),
            "the RPC endpoint is on chain 30, but the multisig is configured for Rootstock Testnet \
             (31)"
        );
    }
}
