//! Network presets.

use alloy_chains::Chain;
use serde::Serialize;

/// Chain id of Rootstock Mainnet.
pub const ROOTSTOCK_MAINNET_ID: u64 = 30;

/// Chain id of Rootstock Testnet.
pub const ROOTSTOCK_TESTNET_ID: u64 = 31;

/// A network the dashboard can talk to: its chain, native currency, RPC endpoint and block
/// explorer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Network {
    pub chain: Chain,
    pub name: String,
    pub currency_symbol: String,
    pub decimals: u8,
    pub rpc_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    /// Whether transactions use legacy gas pricing instead of EIP-1559 fees.
    pub legacy: bool,
}

impl Network {
    /// Rootstock Mainnet.
    pub fn rootstock() -> Self {
        Self {
            chain: Chain::from_id(ROOTSTOCK_MAINNET_ID),
            name: "Rootstock Mainnet".to_string(),
            currency_symbol: "RBTC".to_string(),
            decimals: 18,
            rpc_url: "https://public-node.rsk.co".to_string(),
            explorer_url: Some("https://explorer.rsk.co".to_string()),
            legacy: true,
        }
    }

    /// Rootstock Testnet.
    pub fn rootstock_testnet() -> Self {
        Self {
            chain: Chain::from_id(ROOTSTOCK_TESTNET_ID),
            name: "Rootstock Testnet".to_string(),
            currency_symbol: "RBTC".to_string(),
            decimals: 18,
            rpc_url: "https://public-node.testnet.rsk.co".to_string(),
            explorer_url: Some("https://explorer.testnet.rsk.co".to_string()),
            legacy: true,
        }
    }

    /// Returns the built-in preset for `chain_id`, if any.
    pub fn preset(chain_id: u64) -> Option<Self> {
        match chain_id {
            ROOTSTOCK_MAINNET_ID => Some(Self::rootstock()),
            ROOTSTOCK_TESTNET_ID => Some(Self::rootstock_testnet()),
            _ => None,
        }
    }

    /// A network without a preset; every parameter but the chain id has to be configured.
    pub fn custom(chain_id: u64, rpc_url: String) -> Self {
        let chain = Chain::from_id(chain_id);
        Self {
            name: chain.to_string(),
            chain,
            currency_symbol: "ETH".to_string(),
            decimals: 18,
            rpc_url,
            explorer_url: None,
            legacy: false,
        }
    }

    /// The chain id.
    pub fn chain_id(&self) -> u64 {
        self.chain.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rootstock_presets() {
        let testnet = Network::preset(31).unwrap();
        assert_eq!(testnet, Network::rootstock_testnet());
        assert_eq!(testnet.chain_id(), 31);
        assert_eq!(testnet.currency_symbol, "RBTC");
        assert!(testnet.legacy);

        let mainnet = Network::preset(30).unwrap();
        assert_eq!(mainnet.rpc_url, "https://public-node.rsk.co");
        assert_eq!(mainnet.explorer_url.as_deref(), Some("https://explorer.rsk.co"));

        assert!(Network::preset(1).is_none());
    }

    #[test]
    fn custom_network() {
        let net = Network::custom(31337, "http://localhost:8545".to_string());
        assert_eq!(net.chain_id(), 31337);
        assert_eq!(net.currency_symbol, "ETH");
        assert!(net.explorer_url.is_none());
        assert!(!net.legacy);
    }
}
