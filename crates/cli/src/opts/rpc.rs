use crate::opts::MultisigOpts;
use clap::Parser;
use eyre::Result;
use msig_config::{
    Config,
    figment::{
        self, Figment, Metadata, Profile,
        value::{Dict, Map},
    },
};
use msig_wallets::WalletOpts;
use serde::Serialize;

/// RPC endpoint options.
#[derive(Clone, Debug, Default, Serialize, Parser)]
pub struct RpcOpts {
    /// The RPC endpoint, defaults to the public node of the selected network.
    #[arg(short = 'r', long = "rpc-url", env = "ETH_RPC_URL", value_name = "URL")]
    #[serde(rename = "eth_rpc_url", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Timeout for a single RPC request in seconds.
    #[arg(long, env = "ETH_RPC_TIMEOUT", value_name = "SECONDS")]
    #[serde(rename = "eth_rpc_timeout", skip_serializing_if = "Option::is_none")]
    pub rpc_timeout: Option<u64>,
}

impl figment::Provider for RpcOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("RpcOpts")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Map::from([(Config::selected_profile(), self.dict())]))
    }
}

impl RpcOpts {
    pub fn dict(&self) -> Dict {
        let mut dict = Dict::new();
        if let Some(url) = &self.url {
            dict.insert("eth_rpc_url".into(), url.clone().into());
        }
        if let Some(rpc_timeout) = self.rpc_timeout {
            dict.insert("eth_rpc_timeout".into(), rpc_timeout.into());
        }
        dict
    }
}

/// Everything a command needs to talk to the multisig: the endpoint, the contract and the signer.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Ethereum options")]
pub struct EthereumOpts {
    #[command(flatten)]
    pub rpc: RpcOpts,

    #[command(flatten)]
    pub multisig: MultisigOpts,

    #[command(flatten)]
    pub wallet: WalletOpts,
}

// Make this args a `Figment` so that it can be merged into the `Config`
impl figment::Provider for EthereumOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("Ethereum Opts Provider")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = self.multisig.dict();
        dict.extend(self.rpc.dict());

        if let Some(from) = self.wallet.from {
            dict.insert("sender".to_string(), from.to_string().into());
        }

        Ok(Map::from([(Config::selected_profile(), dict)]))
    }
}

impl From<&EthereumOpts> for Figment {
    fn from(args: &EthereumOpts) -> Self {
        Config::figment().merge(args)
    }
}

impl EthereumOpts {
    /// Loads the [`Config`] with these options merged on top of the files and the environment.
    pub fn load_config(&self) -> Result<Config> {
        let figment: Figment = self.into();
        Ok(Config::try_from(figment)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn cli_overrides_config() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "msig.toml",
                r#"
                [profile.default]
                chain_id = 30
                eth_rpc_url = "https://rpc.example.com"
            "#,
            )?;

            let opts = EthereumOpts::parse_from([
                "msig",
                "--rpc-url",
                "http://localhost:8545",
                "--address",
                "0x0000000000000000000000000000000000000002",
                "--from",
                "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            ]);
            let config = opts.load_config().unwrap();
            assert_eq!(config.chain_id, 30);
            assert_eq!(config.eth_rpc_url.as_deref(), Some("http://localhost:8545"));
            assert_eq!(
                config.multisig_address,
                address!("0000000000000000000000000000000000000002")
            );
            assert_eq!(config.sender, Some(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")));
            Ok(())
        });
    }

    #[test]
    fn files_and_env_apply_without_flags() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "msig.toml",
                r#"
                [profile.default]
                chain_id = 30
                eth_rpc_url = "https://rpc.example.com"
            "#,
            )?;
            jail.set_env("MSIG_POLL_INTERVAL", "3");

            let config = EthereumOpts::parse_from(["msig"]).load_config().unwrap();
            assert_eq!(config.chain_id, 30);
            assert_eq!(config.eth_rpc_url.as_deref(), Some("https://rpc.example.com"));
            assert_eq!(config.poll_interval, 3);
            assert_eq!(config.multisig_address, Config::DEFAULT_MULTISIG_ADDRESS);
            Ok(())
        });
    }
}
