use super::{Context, write_signer};
use clap::Parser;
use eyre::Result;
use msig::{
    AlloySender, Dashboard, MultisigCall, MultisigClient, MultisigReader, WriteFlow, WritePhase,
    render::NOT_OWNER_WARNING,
    write::{ensure_chain, refetch_affected, submit_call},
};
use msig_cli::opts::EthereumOpts;
use msig_common::{sh_println, sh_status, sh_warn};
use std::time::Duration;

/// Options shared by the state-changing commands.
#[derive(Clone, Debug, Parser)]
pub struct SendOpts {
    #[command(flatten)]
    pub eth: EthereumOpts,

    /// Only print the transaction hash and exit immediately.
    #[arg(id = "async", long = "async", env = "MSIG_ASYNC")]
    pub send_async: bool,

    /// The number of confirmations until the receipt is fetched.
    #[arg(long, value_name = "BLOCKS")]
    pub confirmations: Option<u64>,

    /// Seconds to wait for the transaction to be included.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// CLI arguments for `msig submit`.
#[derive(Clone, Debug, Parser)]
pub struct SubmitArgs {
    /// The recipient address.
    #[arg(value_name = "TO")]
    pub to: String,

    /// The amount in the native currency, e.g. `0.01`.
    #[arg(value_name = "AMOUNT")]
    pub amount: String,

    /// Hex encoded calldata for the recipient.
    #[arg(long, value_name = "HEX")]
    pub data: Option<String>,

    #[command(flatten)]
    pub send: SendOpts,
}

impl SubmitArgs {
    pub async fn run(self) -> Result<()> {
        let call = submit_call(&self.to, &self.amount, self.data.as_deref())?;
        self.send.run(call).await
    }
}

/// CLI arguments for `msig confirm`, `msig revoke` and `msig execute`.
#[derive(Clone, Debug, Parser)]
pub struct ActionArgs {
    /// The transaction id.
    #[arg(value_name = "ID")]
    pub id: u64,

    #[command(flatten)]
    pub send: SendOpts,
}

impl ActionArgs {
    pub async fn confirm(self) -> Result<()> {
        self.send.run(MultisigCall::Confirm(self.id)).await
    }

    pub async fn revoke(self) -> Result<()> {
        self.send.run(MultisigCall::Revoke(self.id)).await
    }

    pub async fn execute(self) -> Result<()> {
        self.send.run(MultisigCall::Execute(self.id)).await
    }
}

impl SendOpts {
    async fn run(self, call: MultisigCall) -> Result<()> {
        let ctx = Context::new(&self.eth)?;
        let signer = write_signer(&self.eth)?;
        let from = signer.address();
        let dashboard = ctx.dashboard(Some(from));

        let chain_id = dashboard.reader().chain_id().await?;
        ensure_chain(chain_id, &ctx.network)?;
        warn_unavailable(&dashboard, &call).await;

        let sender = AlloySender::new(
            ctx.provider.clone(),
            signer.into_wallet(),
            ctx.config.multisig_address,
            chain_id,
        )
        .legacy(ctx.network.legacy)
        .confirmations(self.confirmations.unwrap_or(ctx.config.confirmations))
        .timeout(self.timeout.map(Duration::from_secs).unwrap_or(ctx.config.receipt_timeout()));
        let flow = WriteFlow::new(sender);

        if self.send_async {
            sh_status!("Signing", "{call}")?;
            let tx_hash = flow.submit(&call).await?;
            sh_println!("{tx_hash}")?;
            return Ok(());
        }

        let mut phases = flow.subscribe();
        let report = async {
            while phases.changed().await.is_ok() {
                let phase = phases.borrow_and_update().clone();
                // failures are reported once, by the error handler
                if !matches!(phase, WritePhase::Failed(_))
                    && let Some((title, line)) = ctx.renderer.phase(&call, &phase)
                {
                    let _ = sh_status!(title, "{line}");
                }
                if phase.is_terminal() {
                    break;
                }
            }
        };
        let (res, ()) = tokio::join!(flow.run(&call), report);
        res?;
        sh_println!("{}", call.done())?;

        match refetch_affected(&dashboard, &call, ctx.config.refresh_delay()).await {
            Ok(detail) => sh_println!("{}", ctx.renderer.transaction_detail(&detail))?,
            Err(err) => sh_warn!("the transaction was included, but refreshing it failed: {err}")?,
        }
        Ok(())
    }
}

/// Warns when the dashboard would not offer `call` to the signer. The call is sent regardless;
/// the contract decides.
async fn warn_unavailable(dashboard: &Dashboard<MultisigClient>, call: &MultisigCall) {
    match dashboard.account().await {
        Ok(Some(account)) if account.is_owner => {}
        Ok(_) => {
            let _ = sh_warn!("{NOT_OWNER_WARNING}");
            return;
        }
        Err(err) => {
            debug!(%err, "skipping owner check");
            return;
        }
    }

    let Some(index) = call.index() else { return };
    let detail = match dashboard.transaction_detail(index).await {
        Ok(detail) => detail,
        Err(err) => {
            debug!(%err, "skipping availability check");
            return;
        }
    };
    let actions = detail.entry.actions;
    let (offered, reason) = match call {
        _ if detail.entry.tx.executed => (false, "it was already executed"),
        MultisigCall::Confirm(_) => (actions.can_confirm, "you already confirmed it"),
        MultisigCall::Revoke(_) => (actions.can_revoke, "you have not confirmed it"),
        MultisigCall::Execute(_) => (actions.can_execute, "it lacks confirmations"),
        MultisigCall::Submit { .. } => (true, ""),
    };
    if !offered {
        let _ = sh_warn!(
            "{} is not offered for transaction #{index}: {reason}; sending anyway",
            call.label()
        );
    }
}
