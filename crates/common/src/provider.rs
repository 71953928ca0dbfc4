//! Commonly used helpers to construct `Provider`s

mod policy;
pub use policy::RpcRetryPolicy;

use crate::REQUEST_TIMEOUT;
use alloy_network::AnyNetwork;
use alloy_provider::{DynProvider, Provider, RootProvider};
use alloy_rpc_client::ClientBuilder;
use alloy_transport::{layers::RetryBackoffLayer, utils::guess_local_url};
use eyre::{Result, WrapErr};
use std::time::Duration;
use url::Url;

/// Helper type alias for a retrying, type-erased provider.
pub type RetryProvider = DynProvider<AnyNetwork>;

/// Compute units per second assumed for public nodes.
pub const DEFAULT_COMPUTE_UNITS_PER_SECOND: u64 = 330;

/// Constructs a provider for the given URL with the default retry settings.
///
/// See [`ProviderBuilder`] for more details.
#[inline]
pub fn try_get_http_provider(url: impl AsRef<str>) -> Result<RetryProvider> {
    ProviderBuilder::new(url.as_ref()).build()
}

/// Whether the URL points to a local dev node.
pub fn is_local_url(url: &str) -> bool {
    guess_local_url(url)
}

/// Helper type to construct a [`RetryProvider`].
#[derive(Debug)]
pub struct ProviderBuilder {
    // Note: this is a result, so we can easily chain builder calls
    url: Result<Url>,
    max_retry: u32,
    initial_backoff: u64,
    timeout: Duration,
    /// available CUPS
    compute_units_per_second: u64,
}

impl ProviderBuilder {
    /// Creates a new builder instance
    pub fn new(url_str: &str) -> Self {
        // a non-prefixed URL scheme is not allowed, so we prepend the default http prefix
        let url_str = url_str.trim();
        let url = if url_str.starts_with("localhost:") || url_str.starts_with("127.0.0.1:") {
            Url::parse(&format!("http://{url_str}"))
        } else {
            Url::parse(url_str)
        }
        .wrap_err_with(|| format!("invalid provider URL: {url_str:?}"));

        Self {
            url,
            max_retry: 3,
            initial_backoff: 800,
            timeout: REQUEST_TIMEOUT,
            compute_units_per_second: DEFAULT_COMPUTE_UNITS_PER_SECOND,
        }
    }

    /// Sets the timeout of a single request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the timeout of a single request, if provided.
    pub fn maybe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.unwrap_or(self.timeout);
        self
    }

    /// How often to retry a rate limited request
    pub fn max_retry(mut self, max_retry: u32) -> Self {
        self.max_retry = max_retry;
        self
    }

    /// The starting backoff delay in milliseconds to use after the first failed request
    pub fn initial_backoff(mut self, initial_backoff: u64) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// Sets the number of assumed available compute units per second
    pub fn compute_units_per_second(mut self, compute_units_per_second: u64) -> Self {
        self.compute_units_per_second = compute_units_per_second;
        self
    }

    /// Sets aggressive `max_retry` and `initial_backoff` values
    ///
    /// This is only recommend for local dev nodes
    pub fn aggressive(self) -> Self {
        self.max_retry(100).initial_backoff(100)
    }

    /// The parsed endpoint URL.
    pub fn url(&self) -> Result<&Url> {
        self.url.as_ref().map_err(|err| eyre::eyre!("{err}"))
    }

    /// Constructs the [`RetryProvider`].
    pub fn build(self) -> Result<RetryProvider> {
        let Self { url, max_retry, initial_backoff, timeout, compute_units_per_second } = self;
        let url = url?;

        let retry_layer = RetryBackoffLayer::new_with_policy(
            max_retry,
            initial_backoff,
            compute_units_per_second,
            RpcRetryPolicy,
        );
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("failed to build HTTP client")?;
        let is_local = guess_local_url(url.as_str());
        let transport = alloy_transport_http::Http::with_client(http, url);
        let client = ClientBuilder::default().layer(retry_layer).transport(transport, is_local);

        trace!(target: "msig::provider", is_local, "built provider");
        Ok(RootProvider::<AnyNetwork>::new(client).erased())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_urls() {
        assert_eq!(
            ProviderBuilder::new("localhost:8545").url().unwrap().as_str(),
            "http://localhost:8545/"
        );
        assert_eq!(
            ProviderBuilder::new("https://public-node.testnet.rsk.co").url().unwrap().host_str(),
            Some("public-node.testnet.rsk.co")
        );
        assert!(ProviderBuilder::new("not a url").url().is_err());
        assert!(ProviderBuilder::new("not a url").build().is_err());

        assert!(is_local_url("http://127.0.0.1:8545"));
        assert!(!is_local_url("https://public-node.rsk.co"));
    }
}
