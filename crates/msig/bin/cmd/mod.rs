//! Subcommands of the `msig` binary.

use alloy_primitives::Address;
use clap::Parser;
use eyre::Result;
use msig::{Dashboard, MultisigClient, MultisigError, Renderer};
use msig_cli::{opts::EthereumOpts, utils};
use msig_common::{Retry, RetryProvider, sh_verbose, shell::Shell};
use msig_config::{Config, Network};
use msig_wallets::{WalletError, WalletSigner};

pub mod config;
pub mod read;
pub mod watch;
pub mod write;

/// Options shared by the read-only commands.
#[derive(Clone, Debug, Parser)]
pub struct ReadOpts {
    #[command(flatten)]
    pub eth: EthereumOpts,

    /// Print the output as JSON.
    #[arg(long, short, help_heading = "Display options")]
    pub json: bool,
}

/// The resolved configuration and the connections derived from it.
pub struct Context {
    pub config: Config,
    pub network: Network,
    pub provider: RetryProvider,
    pub renderer: Renderer,
}

impl Context {
    pub fn new(eth: &EthereumOpts) -> Result<Self> {
        let config = eth.load_config()?;
        let network = config.network()?;
        let provider = utils::get_provider(&config)?;
        let renderer = Renderer::new(network.clone()).color(Shell::get().color_choice());
        debug!(multisig = %config.multisig_address, chain = %network.name, "loaded config");
        let _ = sh_verbose!("{} ({}) via {}", network.name, network.chain_id(), network.rpc_url);
        let _ = sh_verbose!("multisig wallet {}", config.multisig_address);
        Ok(Self { config, network, provider, renderer })
    }

    /// Reads through the provider, retrying as configured.
    pub fn client(&self) -> MultisigClient {
        MultisigClient::new(self.config.multisig_address, self.provider.clone())
            .with_retry(Retry::new(self.config.read_retries, self.config.read_retry_delay()))
    }

    pub fn dashboard(&self, account: Option<Address>) -> Dashboard<MultisigClient> {
        Dashboard::new(self.client()).with_account(account)
    }
}

/// The account the dashboard is rendered for.
///
/// `--from` or the configured sender take precedence, so reading never prompts for a password.
/// Otherwise a passed signer is unlocked; without one no account is connected.
pub fn read_account(eth: &EthereumOpts, config: &Config) -> Result<Option<Address>> {
    if let Some(sender) = config.sender {
        return Ok(Some(sender));
    }
    if eth.wallet.has_signer() {
        return Ok(Some(eth.wallet.signer()?.address()));
    }
    Ok(None)
}

/// Unlocks the signer for a write.
pub fn write_signer(eth: &EthereumOpts) -> Result<WalletSigner> {
    eth.wallet.signer().map_err(|err| match err.downcast_ref::<WalletError>() {
        Some(WalletError::NotConnected) => MultisigError::WalletNotConnected.into(),
        None => err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_signer_is_not_connected() {
        let eth = EthereumOpts::parse_from(["msig"]);
        let err = write_signer(&eth).unwrap_err();
        assert_eq!(err.downcast_ref::<MultisigError>(), Some(&MultisigError::WalletNotConnected));
    }

    #[test]
    fn reads_configured_sender() {
        let eth = EthereumOpts::parse_from(["msig"]);
        let sender = Address::repeat_byte(7);
        let config = Config { sender: Some(sender), ..Default::default() };
        assert_eq!(read_account(&eth, &config).unwrap(), Some(sender));
        assert_eq!(read_account(&eth, &Config::default()).unwrap(), None);

        let eth = EthereumOpts::parse_from([
            "msig",
            "--private-key",
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        ]);
        assert_eq!(
            read_account(&eth, &Config::default()).unwrap().map(|a| a.to_string()),
            Some("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string())
        );
    }
}
