use clap::Parser;
use eyre::Result;
use msig_cli::opts::EthereumOpts;
use msig_common::sh_println;

/// CLI arguments for `msig config`.
#[derive(Clone, Debug, Parser)]
pub struct ConfigArgs {
    /// Print the resolved network instead of the configuration.
    #[arg(long)]
    pub network: bool,

    /// Print the output as JSON.
    #[arg(long, short)]
    pub json: bool,

    #[command(flatten)]
    pub eth: EthereumOpts,
}

impl ConfigArgs {
    pub fn run(self) -> Result<()> {
        let config = self.eth.load_config()?;
        let out = match (self.network, self.json) {
            (true, _) => serde_json::to_string_pretty(&config.network()?)?,
            (false, true) => serde_json::to_string_pretty(&config)?,
            (false, false) => config.to_string_pretty()?,
        };
        sh_println!("{out}")?;
        Ok(())
    }
}
