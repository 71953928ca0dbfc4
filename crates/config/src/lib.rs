//! # msig-config
//!
//! msig configuration.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate tracing;

use alloy_primitives::{Address, address};
use figment::{
    Error, Figment, Metadata, Profile, Provider,
    providers::{Env, Serialized},
    value::{Dict, Map, Value},
};
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    time::Duration,
};

pub mod error;
pub use error::{ExtractConfigError, NetworkError};

mod network;
pub use network::{Network, ROOTSTOCK_MAINNET_ID, ROOTSTOCK_TESTNET_ID};

// reexport so cli types can implement `figment::Provider` to easily merge cli arguments
pub use alloy_chains::Chain;
pub use figment;

/// msig configuration
///
/// # Defaults
///
/// All configuration values have a default. [`Config::default()`] returns the defaults for the
/// default profile, [`Config::load()`] starts from them and merges the config files and the
/// environment, see [`Config::figment`].
///
/// # Provider Details
///
/// `Config` is a Figment [`Provider`] named `msig Config`, so CLI options can be merged on top of
/// it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The selected profile. **(default: _default_ `default`)**
    ///
    /// **Note:** This field is never serialized nor deserialized. When a `Config` is merged into a
    /// `Figment` as a `Provider`, this profile is selected on the `Figment`. When a `Config` is
    /// extracted, this field is set to the extracting Figment's selected `Profile`.
    #[serde(skip)]
    pub profile: Profile,
    /// The chain the multisig wallet is deployed on.
    pub chain_id: u64,
    /// The RPC endpoint; defaults to the network preset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_rpc_url: Option<String>,
    /// Timeout of a single RPC request, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_rpc_timeout: Option<u64>,
    /// Block explorer base URL; defaults to the network preset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    /// Address of the multisig wallet contract.
    #[serde(serialize_with = "checksummed")]
    pub multisig_address: Address,
    /// The account used when no signer is unlocked, e.g. to highlight "you" in the owners list.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "checksummed_opt")]
    pub sender: Option<Address>,
    /// Seconds between two refreshes in watch mode.
    pub poll_interval: u64,
    /// How often a failed read is retried.
    pub read_retries: u32,
    /// Fixed delay between read attempts, in milliseconds.
    pub read_retry_delay_ms: u64,
    /// Delay before re-reading a transaction after a write was included, in milliseconds.
    pub refresh_delay_ms: u64,
    /// Seconds to wait for a submitted transaction to be included.
    pub receipt_timeout: u64,
    /// Number of block confirmations awaited for a receipt.
    pub confirmations: u64,
    /// Forces legacy (`true`) or EIP-1559 (`false`) gas pricing instead of the network default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy: Option<bool>,
    /// Symbol of the native currency; defaults to the network preset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Self::DEFAULT_PROFILE,
            chain_id: ROOTSTOCK_TESTNET_ID,
            eth_rpc_url: None,
            eth_rpc_timeout: None,
            explorer_url: None,
            multisig_address: Self::DEFAULT_MULTISIG_ADDRESS,
            sender: None,
            poll_interval: 8,
            read_retries: 1,
            read_retry_delay_ms: 1_000,
            refresh_delay_ms: 1_000,
            receipt_timeout: 120,
            confirmations: 1,
            legacy: None,
            currency_symbol: None,
        }
    }
}

impl Config {
    /// The default profile: "default"
    pub const DEFAULT_PROFILE: Profile = Profile::const_new("default");

    /// TOML section for profiles
    pub const PROFILE_SECTION: &'static str = "profile";

    /// File name of config toml file
    pub const FILE_NAME: &'static str = "msig.toml";

    /// The name of the directory msig reserves for itself under the user's home directory: `~`
    pub const MSIG_DIR_NAME: &'static str = ".msig";

    /// The multisig wallet used when none is configured.
    ///
    /// `0x3886eC7a6ca3841944a27439126096d6978f8884`
    pub const DEFAULT_MULTISIG_ADDRESS: Address =
        address!("3886eC7a6ca3841944a27439126096d6978f8884");

    /// Returns the current `Config`
    ///
    /// See [`figment`](Self::figment) for more details.
    pub fn load() -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment())
    }

    /// Attempts to extract a `Config` from `provider`, returning the result.
    ///
    /// # Example
    ///
    /// ```rust
    /// use figment::providers::{Format, Toml};
    /// use msig_config::Config;
    ///
    /// // Use msig's default `Figment`, but allow values from `other.toml`
    /// // to supersede its values.
    /// let figment = Config::figment().merge(Toml::file("other.toml"));
    ///
    /// let config = Config::try_from(figment);
    /// ```
    pub fn try_from<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        trace!("load config with provider: {:?}", provider.metadata());
        let figment = Figment::from(provider);
        let mut config = figment.extract::<Self>().map_err(ExtractConfigError::new)?;
        config.profile = figment.profile().clone();
        Ok(config)
    }

    /// Returns the default figment
    ///
    /// The default figment reads from the following sources, in ascending
    /// priority order:
    ///
    ///   1. [`Config::default()`]
    ///   2. the global `~/.msig/msig.toml`
    ///   3. `msig.toml` in the current directory or its ancestors _or_ the file in the
    ///      `MSIG_CONFIG` environment variable
    ///   4. `MSIG_` prefixed environment variables
    ///
    /// The profile selected is the value set in the `MSIG_PROFILE`
    /// environment variable. If it is not set, it defaults to `default`.
    pub fn figment() -> Figment {
        Self::default().into()
    }

    /// Returns the populated [Figment].
    pub fn to_figment(self) -> Figment {
        let profile = Self::selected_profile();
        let mut figment = Figment::default();

        // merge global msig.toml file
        if let Some(global_toml) = Self::msig_dir_toml().filter(|p| p.exists()) {
            figment = figment.merge(TomlFileProvider::new(global_toml));
        }

        // merge local msig.toml file
        if let Some(local_toml) = Self::find_local_config_file() {
            figment = figment.merge(TomlFileProvider::new(local_toml));
        }

        // merge environment variables
        figment = figment.merge(Env::prefixed("MSIG_").ignore(&["PROFILE", "CONFIG", "DEBUG"]).global());

        Figment::from(self).merge(figment).select(profile)
    }

    /// Returns the selected profile.
    ///
    /// If the `MSIG_PROFILE` env variable is not set, this returns the `DEFAULT_PROFILE`.
    pub fn selected_profile() -> Profile {
        Profile::from_env_or("MSIG_PROFILE", Self::DEFAULT_PROFILE)
    }

    /// Returns the path to msig's global TOML file: `~/.msig/msig.toml`.
    pub fn msig_dir_toml() -> Option<PathBuf> {
        Self::msig_dir().map(|p| p.join(Self::FILE_NAME))
    }

    /// Returns the path to msig's config dir: `~/.msig/`.
    pub fn msig_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(Self::MSIG_DIR_NAME))
    }

    /// Returns the path to msig's keystores dir: `~/.msig/keystores`.
    pub fn msig_keystores_dir() -> Option<PathBuf> {
        Some(Self::msig_dir()?.join("keystores"))
    }

    /// Returns the path to the local `msig.toml` file, the file is searched for in the current
    /// working directory and all parent directories until the root, and the first hit is used.
    ///
    /// An absolute path in `MSIG_CONFIG` is used as is.
    pub fn find_local_config_file() -> Option<PathBuf> {
        fn find(path: &Path) -> Option<PathBuf> {
            if path.is_absolute() {
                return path.is_file().then(|| path.to_path_buf());
            }
            let cwd = std::env::current_dir().ok()?;
            let mut cwd = cwd.as_path();
            loop {
                let file_path = cwd.join(path);
                if file_path.is_file() {
                    return Some(file_path);
                }
                cwd = cwd.parent()?;
            }
        }
        find(Env::var_or("MSIG_CONFIG", Self::FILE_NAME).as_ref())
    }

    /// Returns the configured rpc url, if any.
    pub fn get_rpc_url(&self) -> Option<Cow<'_, str>> {
        self.eth_rpc_url.as_deref().map(Cow::Borrowed)
    }

    /// The request timeout, if configured.
    pub fn rpc_timeout(&self) -> Option<Duration> {
        self.eth_rpc_timeout.map(Duration::from_secs)
    }

    /// Resolves the [`Network`]: the preset for `chain_id` with the configured overrides applied.
    pub fn network(&self) -> Result<Network, NetworkError> {
        let mut network = match (Network::preset(self.chain_id), &self.eth_rpc_url) {
            (Some(preset), _) => preset,
            (None, Some(url)) => Network::custom(self.chain_id, url.clone()),
            (None, None) => return Err(NetworkError::MissingRpcUrl(self.chain_id)),
        };
        if let Some(url) = &self.eth_rpc_url {
            network.rpc_url.clone_from(url);
        }
        if let Some(explorer) = &self.explorer_url {
            network.explorer_url = Some(explorer.clone());
        }
        if let Some(legacy) = self.legacy {
            network.legacy = legacy;
        }
        if let Some(symbol) = &self.currency_symbol {
            network.currency_symbol.clone_from(symbol);
        }
        Ok(network)
    }

    /// Delay between two refreshes in watch mode.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval.max(1))
    }

    /// Fixed delay between read attempts.
    pub fn read_retry_delay(&self) -> Duration {
        Duration::from_millis(self.read_retry_delay_ms)
    }

    /// Delay before refreshing after a confirmed write.
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    /// Timeout for receipt polling.
    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout)
    }

    /// Serializes the configuration to a TOML string, under the selected profile.
    pub fn to_string_pretty(&self) -> Result<String, toml::ser::Error> {
        let mut wrapping = toml::Table::new();
        let mut profiles = toml::Table::new();
        profiles.insert(self.profile.to_string(), toml::Value::try_from(self)?);
        wrapping.insert(Self::PROFILE_SECTION.to_string(), toml::Value::Table(profiles));
        toml::to_string_pretty(&wrapping)
    }
}

impl From<Config> for Figment {
    fn from(c: Config) -> Self {
        c.to_figment()
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("msig Config")
    }

    #[track_caller]
    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut data = Serialized::defaults(self).data()?;
        if let Some(entry) = data.remove(&Profile::Default) {
            data.insert(self.profile.clone(), entry);
        }
        Ok(data)
    }

    fn profile(&self) -> Option<Profile> {
        Some(self.profile.clone())
    }
}

/// Writes an address in its EIP-55 checksummed form.
fn checksummed<S: serde::Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&address.to_checksum(None))
}

fn checksummed_opt<S: serde::Serializer>(
    address: &Option<Address>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match address {
        Some(address) => checksummed(address, serializer),
        None => serializer.serialize_none(),
    }
}

/// Reads an `msig.toml` file: every `[profile.<name>]` table becomes the data of that profile.
#[derive(Clone, Debug)]
struct TomlFileProvider {
    path: PathBuf,
}

impl TomlFileProvider {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Provider for TomlFileProvider {
    fn metadata(&self) -> Metadata {
        let name = format!("{} ({})", Config::FILE_NAME, self.path.display());
        Metadata::from(name, self.path.as_path())
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|err| Error::from(format!("failed to read {}: {err}", self.path.display())))?;
        let mut table: Dict = toml::from_str(&content).map_err(|err| Error::from(err.to_string()))?;

        let mut profiles = Map::new();
        match table.remove(Config::PROFILE_SECTION) {
            Some(Value::Dict(_, sections)) => {
                for (name, section) in sections {
                    let Value::Dict(_, dict) = section else {
                        return Err(Error::from(format!(
                            "expected a table for `[{}.{name}]`",
                            Config::PROFILE_SECTION
                        )));
                    };
                    profiles.insert(Profile::new(&name), dict);
                }
            }
            Some(_) => {
                return Err(Error::from(format!(
                    "expected `{}` to be a table of profiles",
                    Config::PROFILE_SECTION
                )));
            }
            None => {}
        }

        // top level keys apply to the default profile
        if !table.is_empty() {
            profiles.entry(Config::DEFAULT_PROFILE).or_default().extend(table);
        }
        Ok(profiles)
    }
}
