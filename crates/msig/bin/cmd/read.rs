use super::{Context, ReadOpts, read_account};
use clap::Parser;
use eyre::Result;
use msig::{StatusFilter, TxFilter, render::to_json};
use msig_common::sh_println;

/// CLI arguments for `msig status`.
#[derive(Clone, Debug, Parser)]
pub struct StatusArgs {
    #[command(flatten)]
    pub read: ReadOpts,

    #[command(flatten)]
    pub filter: FilterArgs,
}

impl StatusArgs {
    pub async fn run(self) -> Result<()> {
        let Self { read, filter } = self;
        let ctx = Context::new(&read.eth)?;
        let account = read_account(&read.eth, &ctx.config)?;
        let snapshot = ctx.dashboard(account).snapshot(&filter.filter()).await;
        if read.json {
            sh_println!("{}", to_json(&snapshot)?)?;
        } else {
            sh_println!("{}", ctx.renderer.snapshot(&snapshot))?;
        }
        Ok(())
    }
}

/// Status filter and search of the transaction list.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Filter options")]
pub struct FilterArgs {
    /// Only show transactions with this status.
    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,

    /// Only show transactions whose id or recipient contains this text.
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn filter(&self) -> TxFilter {
        TxFilter::new(self.status, self.search.clone())
    }
}

/// CLI arguments for `msig owners`.
#[derive(Clone, Debug, Parser)]
pub struct OwnersArgs {
    #[command(flatten)]
    pub read: ReadOpts,
}

impl OwnersArgs {
    pub async fn run(self) -> Result<()> {
        let ctx = Context::new(&self.read.eth)?;
        let account = read_account(&self.read.eth, &ctx.config)?;
        let owners = ctx.dashboard(account).owners().await?;
        if self.read.json {
            sh_println!("{}", to_json(&owners)?)?;
        } else {
            sh_println!("{}", ctx.renderer.owners(&owners))?;
        }
        Ok(())
    }
}

/// CLI arguments for `msig txs`.
#[derive(Clone, Debug, Parser)]
pub struct TxsArgs {
    #[command(flatten)]
    pub read: ReadOpts,

    #[command(flatten)]
    pub filter: FilterArgs,
}

impl TxsArgs {
    pub async fn run(self) -> Result<()> {
        let ctx = Context::new(&self.read.eth)?;
        let account = read_account(&self.read.eth, &ctx.config)?;
        let list = ctx.dashboard(account).transactions(&self.filter.filter()).await?;
        if self.read.json {
            sh_println!("{}", to_json(&list)?)?;
        } else {
            sh_println!("{}", ctx.renderer.transactions(&list))?;
        }
        Ok(())
    }
}

/// CLI arguments for `msig tx`.
#[derive(Clone, Debug, Parser)]
pub struct TxArgs {
    /// The transaction id.
    #[arg(value_name = "ID")]
    pub id: u64,

    #[command(flatten)]
    pub read: ReadOpts,
}

impl TxArgs {
    pub async fn run(self) -> Result<()> {
        let ctx = Context::new(&self.read.eth)?;
        let account = read_account(&self.read.eth, &ctx.config)?;
        let detail = ctx.dashboard(account).transaction_detail(self.id).await?;
        if self.read.json {
            sh_println!("{}", to_json(&detail)?)?;
        } else {
            sh_println!("{}", ctx.renderer.transaction_detail(&detail))?;
        }
        Ok(())
    }
}

/// CLI arguments for `msig account`.
#[derive(Clone, Debug, Parser)]
pub struct AccountArgs {
    #[command(flatten)]
    pub read: ReadOpts,
}

impl AccountArgs {
    pub async fn run(self) -> Result<()> {
        let ctx = Context::new(&self.read.eth)?;
        let account = read_account(&self.read.eth, &ctx.config)?;
        let info = ctx.dashboard(account).account().await?;
        if self.read.json {
            sh_println!("{}", to_json(&info)?)?;
        } else {
            sh_println!("{}", ctx.renderer.account(info.as_ref()))?;
        }
        Ok(())
    }
}
