//! Fixed-length hex account identifiers

use std::fmt;
use std::str::FromStr;

use crate::errors::GatewayError;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// An on-chain account address.
///
/// Addresses arrive from the provider as hex strings in mixed case; they
/// are stored as raw bytes so equality is case-insensitive and cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    /// The all-zero address, used by the contract for "no counterparty".
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Abbreviated form for logging, e.g. `0x1234..abcd`.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}..{}", &full[..6], &full[full.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        if hex.len() != ADDRESS_LEN * 2 {
            return Err(GatewayError::invalid_address(s, "expected 40 hex digits"));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| GatewayError::invalid_address(s, "non-ASCII input"))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| GatewayError::invalid_address(s, "non-hex digit"))?;
        }
        Ok(Address(bytes))
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let addr: Address = "0x12158B9216111769871377F36b99cD8F1893E9F5".parse().unwrap();
        assert_eq!(addr.to_string(), "0x12158b9216111769871377f36b99cd8f1893e9f5");
    }

    #[test]
    fn test_case_insensitive_equality() {
        let upper: Address = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01".parse().unwrap();
        let lower: Address = "0xabcdef0123456789abcdef0123456789abcdef01".parse().unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("not-an-address-not-an-address-not-an-add".parse::<Address>().is_err());
        assert!("".parse::<Address>().is_err());
    }

    #[test]
    fn test_zero_address() {
        let zero: Address = "0x0000000000000000000000000000000000000000".parse().unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero, Address::ZERO);
    }

    #[test]
    fn test_short_form() {
        let addr: Address = "0x12158B9216111769871377F36b99cD8F1893E9F5".parse().unwrap();
        assert_eq!(addr.short(), "0x1215..e9f5");
    }
}
