use super::{Context, ReadOpts, read::FilterArgs, read_account};
use clap::Parser;
use eyre::Result;
use msig::{
    Snapshot,
    poll::{Poller, ctrl_c},
    render::to_json,
};
use msig_common::{sh_println, sh_status};
use std::time::Duration;

/// CLI arguments for `msig watch`.
#[derive(Clone, Debug, Parser)]
pub struct WatchArgs {
    /// Seconds between two refreshes, defaults to `poll_interval` of the config.
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Stop after this many refreshes.
    #[arg(long, value_name = "N")]
    pub count: Option<u64>,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub read: ReadOpts,
}

impl WatchArgs {
    pub async fn run(self) -> Result<()> {
        let ctx = Context::new(&self.read.eth)?;
        let account = read_account(&self.read.eth, &ctx.config)?;
        let dashboard = ctx.dashboard(account);
        let filter = self.filter.filter();
        let interval = self.interval.map(Duration::from_secs).unwrap_or(ctx.config.poll_interval());
        let json = self.read.json;

        let poller = Poller::new(interval).count(self.count);
        let print = |tick: u64, snapshot: &Snapshot| {
            if json {
                match to_json(snapshot) {
                    Ok(json) => {
                        let _ = sh_println!("{json}");
                    }
                    Err(err) => error!(%err, "failed to serialize snapshot"),
                }
                return;
            }
            let _ = sh_status!("Refreshed", "#{tick}, next in {}s (ctrl-c to stop)", interval.as_secs());
            let _ = sh_println!("{}\n", ctx.renderer.snapshot(snapshot));
        };
        poller.run(|| dashboard.snapshot(&filter), print, ctrl_c()).await;
        Ok(())
    }
}
