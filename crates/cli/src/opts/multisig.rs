use alloy_primitives::Address;
use clap::Parser;
use msig_config::{Chain, figment::value::Dict};
use serde::Serialize;

/// Selects the multisig wallet contract and its network.
#[derive(Clone, Debug, Default, Serialize, Parser)]
pub struct MultisigOpts {
    /// Address of the multisig wallet contract.
    #[arg(long, value_name = "ADDRESS")]
    #[serde(rename = "multisig_address", skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    /// The chain name or EIP-155 chain ID, e.g. `30` for Rootstock or `31` for its testnet.
    #[arg(short, long, alias = "chain-id", value_name = "CHAIN")]
    #[serde(skip)]
    pub chain: Option<Chain>,
}

impl MultisigOpts {
    pub fn dict(&self) -> Dict {
        let mut dict = Dict::new();
        if let Some(address) = self.address {
            dict.insert("multisig_address".into(), address.to_string().into());
        }
        if let Some(chain) = self.chain {
            dict.insert("chain_id".into(), chain.id().into());
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_chain() {
        let opts = MultisigOpts::parse_from(["msig", "--chain", "31"]);
        assert_eq!(opts.chain.map(|c| c.id()), Some(31));
        assert_eq!(opts.dict().get("chain_id").and_then(|v| v.to_u128()), Some(31));

        assert!(MultisigOpts::try_parse_from(["msig", "--address", "0x1234"]).is_err());
    }
}
