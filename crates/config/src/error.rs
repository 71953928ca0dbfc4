//! Configuration errors.
use figment::providers::{Format, Toml};
use std::{collections::HashSet, error::Error, fmt};

/// The message shown if the config could not be extracted from the figment
pub const FAILED_TO_EXTRACT_CONFIG_MSG: &str = "failed to extract msig config:";

/// Represents a failed attempt to extract `Config` from a `Figment`
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfigError {
    /// error thrown when extracting the `Config`
    pub(crate) error: figment::Error,
}

impl ExtractConfigError {
    /// Wraps the figment error
    pub fn new(error: figment::Error) -> Self {
        Self { error }
    }
}

impl fmt::Display for ExtractConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut unique_errors = Vec::with_capacity(self.error.count());
        let mut unique = HashSet::with_capacity(self.error.count());
        for err in self.error.clone() {
            let err = if err
                .metadata
                .as_ref()
                .map(|meta| meta.name.contains(Toml::NAME) || meta.name.contains("msig.toml"))
                .unwrap_or_default()
            {
                MsigConfigError::Toml(err)
            } else {
                MsigConfigError::Other(err)
            };

            if unique.insert(err.to_string()) {
                unique_errors.push(err);
            }
        }
        writeln!(f, "{FAILED_TO_EXTRACT_CONFIG_MSG}")?;
        for err in unique_errors {
            writeln!(f, "{err}")?;
        }
        Ok(())
    }
}

impl Error for ExtractConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Error::source(&self.error)
    }
}

/// Represents an error that can occur when constructing the `Config`
#[derive(Clone, Debug, PartialEq)]
pub enum MsigConfigError {
    /// An error thrown during toml parsing
    Toml(figment::Error),
    /// Any other error thrown when constructing the config's figment
    Other(figment::Error),
}

impl fmt::Display for MsigConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_err = |err: &figment::Error, f: &mut fmt::Formatter<'_>| {
            write!(f, "{err}")?;
            if !err.path.is_empty() {
                // the path will contain the setting value like `["chain_id"]`
                write!(f, " for setting `{}`", err.path.join("."))?;
            }
            Ok(())
        };

        match self {
            Self::Toml(err) => {
                f.write_str("msig.toml error: ")?;
                fmt_err(err, f)
            }
            Self::Other(err) => {
                f.write_str("msig config error: ")?;
                fmt_err(err, f)
            }
        }
    }
}

impl Error for MsigConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Other(error) | Self::Toml(error) => Error::source(error),
        }
    }
}

/// Errors resolving the [`Network`](crate::Network) to talk to.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("no RPC endpoint configured for chain {0}; pass --rpc-url or set `eth_rpc_url`")]
    MissingRpcUrl(u64),
}
