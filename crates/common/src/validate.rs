//! Validation of user supplied addresses and call data.

use alloy_primitives::{Address, Bytes, hex};

/// Errors returned by input validation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid address `{0}`: expected 0x followed by 40 hex characters")]
    MalformedAddress(String),
    #[error("invalid address `{0}`: bad EIP-55 checksum")]
    BadChecksum(String),
    #[error("invalid hex data `{input}`: {reason}")]
    InvalidHex { input: String, reason: String },
}

/// Parses a `0x`-prefixed 20 byte hex address.
///
/// All-lowercase and all-uppercase addresses are accepted as is. Mixed case addresses must carry a
/// valid EIP-55 checksum.
pub fn parse_address(input: &str) -> Result<Address, ValidationError> {
    let input = input.trim();
    let malformed = || ValidationError::MalformedAddress(input.to_string());

    let digits = input.strip_prefix("0x").ok_or_else(malformed)?;
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(input, None)
            .map_err(|_| ValidationError::BadChecksum(input.to_string()));
    }
    input.parse().map_err(|_| malformed())
}

/// Returns `true` if `input` is a well-formed address, see [`parse_address`].
pub fn is_valid_address(input: &str) -> bool {
    parse_address(input).is_ok()
}

/// Normalizes optional call data.
///
/// Empty input and a bare `0x` are empty call data; `0x`-prefixed and unprefixed hex strings are
/// decoded.
pub fn normalize_hex_data(input: &str) -> Result<Bytes, ValidationError> {
    let input = input.trim();
    let digits = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")).unwrap_or(input);
    if digits.is_empty() {
        return Ok(Bytes::new());
    }
    hex::decode(digits).map(Bytes::from).map_err(|err| ValidationError::InvalidHex {
        input: input.to_string(),
        reason: err.to_string(),
    })
}

/// Returns `true` if `input` is acceptable call data, see [`normalize_hex_data`].
pub fn is_valid_hex_data(input: &str) -> bool {
    normalize_hex_data(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn accepts_well_formed_addresses() {
        let expected = address!("3886eC7a6ca3841944a27439126096d6978f8884");
        assert_eq!(parse_address("0x3886eC7a6ca3841944a27439126096d6978f8884").unwrap(), expected);
        assert_eq!(parse_address("0x3886ec7a6ca3841944a27439126096d6978f8884").unwrap(), expected);
        assert_eq!(parse_address("0x3886EC7A6CA3841944A27439126096D6978F8884").unwrap(), expected);
        assert!(is_valid_address("  0x0000000000000000000000000000000000000000 "));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for input in [
            "",
            "0x",
            "3886ec7a6ca3841944a27439126096d6978f8884",
            "0x3886ec7a6ca3841944a27439126096d6978f888",
            "0x3886ec7a6ca3841944a27439126096d6978f888400",
            "0x3886ec7a6ca3841944a27439126096d6978f888g",
            "0X3886ec7a6ca3841944a27439126096d6978f8884",
            "vitalik.eth",
        ] {
            assert!(
                matches!(parse_address(input), Err(ValidationError::MalformedAddress(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn rejects_bad_checksum() {
        assert_eq!(
            parse_address("0x3886Ec7a6ca3841944a27439126096d6978f8884"),
            Err(ValidationError::BadChecksum("0x3886Ec7a6ca3841944a27439126096d6978f8884".into()))
        );
    }

    #[test]
    fn normalizes_hex_data() {
        assert_eq!(normalize_hex_data("").unwrap(), Bytes::new());
        assert_eq!(normalize_hex_data("0x").unwrap(), Bytes::new());
        assert_eq!(normalize_hex_data("0xdeadbeef").unwrap(), Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(normalize_hex_data("DEADBEEF").unwrap(), Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));
        assert!(is_valid_hex_data(" 0xa9059cbb "));
    }

    #[test]
    fn rejects_invalid_hex_data() {
        assert!(!is_valid_hex_data("0xzz"));
        assert!(!is_valid_hex_data("hello"));
        assert!(!is_valid_hex_data("0xabc"));
        assert!(matches!(normalize_hex_data("0x12 34"), Err(ValidationError::InvalidHex { .. })));
    }
}
