//! Conversions between decimal amounts and integer base units (wei).

use crate::NATIVE_DECIMALS;
use alloy_primitives::{U256, utils::format_units as alloy_format_units};

/// Errors returned when parsing a decimal amount.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnitsError {
    #[error("amount is empty")]
    Empty,
    #[error("invalid amount `{0}`: expected a non-negative decimal number")]
    Invalid(String),
    #[error("invalid amount `{amount}`: at most {decimals} fractional digits are supported")]
    TooPrecise { amount: String, decimals: u8 },
    #[error("amount `{0}` is too large")]
    Overflow(String),
}

/// Formats `value` base units as a decimal string with `decimals` decimals.
///
/// Trailing fractional zeros are trimmed, so `1 ether` is `"1"` and zero is `"0"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    // `alloy_format_units` only fails for decimals > 77, which no chain uses.
    let Ok(formatted) = alloy_format_units(value, decimals) else {
        return value.to_string();
    };
    trim_fraction(formatted)
}

/// Formats a native currency amount, treating a missing value as zero.
pub fn format_native(value: Option<U256>) -> String {
    value.map(|v| format_units(v, NATIVE_DECIMALS)).unwrap_or_else(|| "0".to_string())
}

fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s.is_empty() || s == "-" { "0".to_string() } else { s }
}

/// Parses a decimal amount into base units.
///
/// Amounts with more fractional digits than `decimals` are rejected instead of rounded.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, UnitsError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }
    let invalid = || UnitsError::Invalid(amount.to_string());

    let (int, frac) = match amount.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (amount, ""),
    };
    if int.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !int.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > decimals as usize {
        return Err(UnitsError::TooPrecise { amount: amount.to_string(), decimals });
    }

    let overflow = || UnitsError::Overflow(amount.to_string());
    let int = if int.is_empty() { U256::ZERO } else { int.parse::<U256>().map_err(|_| overflow())? };
    let frac = if frac.is_empty() {
        U256::ZERO
    } else {
        let scale = U256::from(10u8).pow(U256::from(decimals as usize - frac.len()));
        frac.parse::<U256>().map_err(|_| invalid())? * scale
    };
    let unit = U256::from(10u8).pow(U256::from(decimals));
    int.checked_mul(unit).and_then(|v| v.checked_add(frac)).ok_or_else(overflow)
}

/// Parses an amount of the native currency (18 decimals).
pub fn parse_native(amount: &str) -> Result<U256, UnitsError> {
    parse_units(amount, NATIVE_DECIMALS)
}
