//! Display helpers for addresses, explorer links and confirmation progress.

use alloy_primitives::U256;
use std::fmt::Display;

/// Number of hex characters kept on each side by [`truncate_address`] by default.
pub const DEFAULT_TRUNCATE_LEN: usize = 6;

/// Shortens an address for display: `0x` plus `len` leading characters, `...`, and the last `len`
/// characters.
///
/// Strings short enough to not benefit from truncation are returned unchanged.
pub fn truncate_address(address: &str, len: usize) -> String {
    let chars = address.chars().count();
    if chars <= len * 2 + 2 {
        return address.to_string();
    }
    let head: String = address.chars().take(len + 2).collect();
    let tail: String = address.chars().skip(chars - len).collect();
    format!("{head}...{tail}")
}

/// The account panel form of an address, `0x1234...abcd`.
pub fn short_account(address: &str) -> String {
    let chars = address.chars().count();
    if chars <= 10 {
        return address.to_string();
    }
    let head: String = address.chars().take(6).collect();
    let tail: String = address.chars().skip(chars - 4).collect();
    format!("{head}...{tail}")
}

/// Block explorer link to a transaction.
pub fn explorer_tx_url(base: &str, tx_hash: impl Display) -> String {
    format!("{}/tx/{tx_hash}", base.trim_end_matches('/'))
}

/// Block explorer link to an address.
pub fn explorer_address_url(base: &str, address: impl Display) -> String {
    format!("{}/address/{address}", base.trim_end_matches('/'))
}

/// Confirmation progress in percent, capped at 100.
pub fn progress_percent(confirmations: U256, required: U256) -> u8 {
    if required.is_zero() {
        return 0;
    }
    let percent = confirmations.saturating_mul(U256::from(100u8)) / required;
    percent.min(U256::from(100u8)).to::<u8>()
}

/// Share of owners needed to approve a transaction, rounded to the nearest percent.
pub fn threshold_percent(required: U256, owners: U256) -> u64 {
    if required.is_zero() || owners.is_zero() {
        return 0;
    }
    let scaled = required.saturating_mul(U256::from(200u8)) / owners;
    let rounded = (scaled + U256::from(1u8)) / U256::from(2u8);
    rounded.saturating_to::<u64>()
}

/// Renders a fixed width progress bar, e.g. `[#####.....]`.
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width).div_ceil(100);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x3886eC7a6ca3841944a27439126096d6978f8884";

    #[test]
    fn truncates_long_addresses() {
        assert_eq!(truncate_address(ADDR, DEFAULT_TRUNCATE_LEN), "0x3886eC...8f8884");
        assert_eq!(truncate_address(ADDR, 4), "0x3886...8884");
        let out = truncate_address(ADDR, 6);
        assert!(out.starts_with(&ADDR[..8]));
        assert!(out.ends_with(&ADDR[ADDR.len() - 6..]));
    }

    #[test]
    fn passes_short_strings_through() {
        assert_eq!(truncate_address("", 6), "");
        assert_eq!(truncate_address("0x1234", 6), "0x1234");
        assert_eq!(truncate_address("0x123456789012", 6), "0x123456789012");
        assert_eq!(truncate_address("0x1234567890123", 6), "0x123456...890123");
    }

    #[test]
    fn short_account_form() {
        assert_eq!(short_account(ADDR), "0x3886...8884");
        assert_eq!(short_account("0x12"), "0x12");
    }

    #[test]
    fn explorer_links() {
        assert_eq!(
            explorer_address_url("https://explorer.testnet.rsk.co/", ADDR),
            format!("https://explorer.testnet.rsk.co/address/{ADDR}")
        );
        assert_eq!(explorer_tx_url("https://explorer.rsk.co", "0xabc"), "https://explorer.rsk.co/tx/0xabc");
    }

    #[test]
    fn progress() {
        assert_eq!(progress_percent(U256::from(1), U256::from(2)), 50);
        assert_eq!(progress_percent(U256::from(3), U256::from(2)), 100);
        assert_eq!(progress_percent(U256::from(3), U256::ZERO), 0);
        assert_eq!(progress_bar(50, 10), "[#####.....]");
        assert_eq!(progress_bar(0, 4), "[....]");
        assert_eq!(progress_bar(100, 4), "[####]");
    }

    #[test]
    fn threshold() {
        assert_eq!(threshold_percent(U256::from(2), U256::from(3)), 67);
        assert_eq!(threshold_percent(U256::from(1), U256::from(3)), 33);
        assert_eq!(threshold_percent(U256::from(1), U256::from(2)), 50);
        assert_eq!(threshold_percent(U256::from(3), U256::from(3)), 100);
        assert_eq!(threshold_percent(U256::ZERO, U256::from(3)), 0);
        assert_eq!(threshold_percent(U256::from(2), U256::ZERO), 0);
    }
}
