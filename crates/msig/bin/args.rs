use crate::cmd::{
    config::ConfigArgs,
    read::{AccountArgs, OwnersArgs, StatusArgs, TxArgs, TxsArgs},
    watch::WatchArgs,
    write::{ActionArgs, SubmitArgs},
};
use clap::{Parser, Subcommand};
use msig_cli::opts::ShellOptions;

/// Inspect and operate a multisig wallet from the command line.
#[derive(Parser)]
#[command(
    name = "msig",
    version,
    after_help = "Networks: `--chain 31` (Rootstock Testnet, default) or `--chain 30` (Rootstock Mainnet).",
    next_display_order = None,
)]
pub struct Msig {
    #[command(flatten)]
    pub shell: ShellOptions,

    #[command(subcommand)]
    pub cmd: MsigSubcommand,
}

#[derive(Subcommand)]
pub enum MsigSubcommand {
    /// Prints the wallet stats, the connected account, the owners and the transactions.
    #[command(visible_alias = "s")]
    Status(StatusArgs),

    /// Lists the owners of the wallet.
    #[command(visible_alias = "o")]
    Owners(OwnersArgs),

    /// Lists the transactions of the wallet.
    #[command(visible_aliases = &["transactions", "ls"])]
    Txs(TxsArgs),

    /// Prints the details of a transaction, including the owners that confirmed it.
    #[command(visible_alias = "transaction")]
    Tx(TxArgs),

    /// Prints the connected account: address, balance and whether it owns the wallet.
    #[command(visible_alias = "a")]
    Account(AccountArgs),

    /// Proposes a new transaction.
    Submit(SubmitArgs),

    /// Confirms a pending transaction.
    #[command(visible_alias = "approve")]
    Confirm(ActionArgs),

    /// Revokes the confirmation of a pending transaction.
    Revoke(ActionArgs),

    /// Executes a transaction that reached the required confirmations.
    Execute(ActionArgs),

    /// Refreshes the dashboard on an interval until interrupted.
    #[command(visible_alias = "w")]
    Watch(WatchArgs),

    /// Prints the resolved configuration.
    #[command(visible_alias = "c")]
    Config(ConfigArgs),
}
