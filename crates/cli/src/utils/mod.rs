use eyre::Result;
use msig_common::{ProviderBuilder, RetryProvider};
use msig_config::Config;
use std::path::Path;
use tracing_subscriber::prelude::*;

/// Initializes a tracing Subscriber for logging.
///
/// `RUST_LOG` selects the directives, nothing is logged by default.
pub fn subscriber() {
    let registry = tracing_subscriber::Registry::default().with(env_filter());
    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(true);
    if let Err(err) = registry.with(fmt).try_init() {
        eprintln!("failed to install the tracing subscriber: {err}");
    }
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    const DEFAULT_DIRECTIVES: &[&str] = &["hyper=off", "reqwest=off", "rustls=off"];
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for &directive in DEFAULT_DIRECTIVES {
        match directive.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(err) => eprintln!("invalid log directive {directive:?}: {err}"),
        }
    }
    filter
}

/// Loads a dotenv file, from the cwd and the project root, ignoring potential failure.
///
/// We could use `warn!` here, but that would imply that the dotenv file can't be configured
/// through the config file.
pub fn load_dotenv() {
    let load = |p: &Path| {
        dotenvy::from_path(p.join(".env")).ok();
    };

    // we only want the .env file of the cwd and of the directory holding the local config file
    if let Some(root) = Config::find_local_config_file().as_deref().and_then(Path::parent) {
        load(root);
    }
    if let Ok(cwd) = std::env::current_dir() {
        load(&cwd);
    }
}

/// Returns a [`RetryProvider`] for the network resolved from the config.
pub fn get_provider(config: &Config) -> Result<RetryProvider> {
    get_provider_builder(config)?.build()
}

/// Returns a [`ProviderBuilder`] instantiated using [Config] values.
///
/// Defaults to the public node of the configured network.
pub fn get_provider_builder(config: &Config) -> Result<ProviderBuilder> {
    let network = config.network()?;
    let url = config.get_rpc_url().map(|url| url.into_owned()).unwrap_or(network.rpc_url);
    debug!(%url, chain_id = config.chain_id, "connecting");
    let mut builder = ProviderBuilder::new(&url).maybe_timeout(config.rpc_timeout());
    if msig_common::provider::is_local_url(&url) {
        builder = builder.aggressive();
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_uses_network_default() {
        let builder = get_provider_builder(&Config::default()).unwrap();
        assert_eq!(builder.url().unwrap().as_str(), "https://public-node.testnet.rsk.co/");

        let config = Config { chain_id: 1337, ..Default::default() };
        assert!(get_provider_builder(&config).is_err());

        let config = Config {
            chain_id: 1337,
            eth_rpc_url: Some("localhost:8545".to_string()),
            ..Default::default()
        };
        let builder = get_provider_builder(&config).unwrap();
        assert_eq!(builder.url().unwrap().as_str(), "http://localhost:8545/");
    }
}
