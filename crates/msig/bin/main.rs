#[macro_use]
extern crate tracing;

use clap::Parser;
use eyre::Result;
use msig_cli::{handler, utils};

mod args;
mod cmd;

use args::{Msig, MsigSubcommand};

fn main() {
    if let Err(err) = run() {
        let _ = msig_common::sh_err!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    handler::install(msig::error::hint);
    utils::load_dotenv();
    utils::subscriber();
    let args = Msig::parse();
    args.shell.set_global_shell();
    main_args(args)
}

#[tokio::main]
async fn main_args(args: Msig) -> Result<()> {
    match args.cmd {
        MsigSubcommand::Status(cmd) => cmd.run().await,
        MsigSubcommand::Owners(cmd) => cmd.run().await,
        MsigSubcommand::Txs(cmd) => cmd.run().await,
        MsigSubcommand::Tx(cmd) => cmd.run().await,
        MsigSubcommand::Account(cmd) => cmd.run().await,
        MsigSubcommand::Submit(cmd) => cmd.run().await,
        MsigSubcommand::Confirm(cmd) => cmd.confirm().await,
        MsigSubcommand::Revoke(cmd) => cmd.revoke().await,
        MsigSubcommand::Execute(cmd) => cmd.execute().await,
        MsigSubcommand::Watch(cmd) => cmd.run().await,
        MsigSubcommand::Config(cmd) => cmd.run(),
    }
}
