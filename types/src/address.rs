//! EVM-style 20-byte account address.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 20-byte account address, parsed from `0x`-prefixed hex.
///
/// Stored as raw bytes, so equality and hashing are case-insensitive by
/// construction. Displays as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

/// Errors from parsing an address string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,

    #[error("address must be 40 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex in address: {0}")]
    InvalidHex(String),
}

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create an address from raw bytes.
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Parse a `0x`-prefixed hex address. Accepts any letter case.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let hex_part = s.strip_prefix("0x").ok_or(AddressError::MissingPrefix)?;
        if hex_part.len() != 40 {
            return Err(AddressError::InvalidLength(hex_part.len()));
        }
        let decoded =
            hex::decode(hex_part).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Return the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Left-pad to a 32-byte indexed log topic.
    pub fn to_topic(&self) -> [u8; 32] {
        let mut topic = [0u8; 32];
        topic[12..].copy_from_slice(&self.0);
        topic
    }

    /// Extract an address from the low 20 bytes of a 32-byte log topic.
    pub fn from_topic(topic: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&topic[12..]);
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_mixed_case() {
        let lower = Address::parse("0xb8c997b66f137c2e6e3e52a56ac8b31d75df1d41").unwrap();
        let upper = Address::parse("0xB8C997B66F137C2E6E3E52A56AC8B31D75DF1D41").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            Address::parse("b8c997b66f137c2e6e3e52a56ac8b31d75df1d41"),
            Err(AddressError::MissingPrefix)
        );
        assert_eq!(
            Address::parse("0xb8c997"),
            Err(AddressError::InvalidLength(6))
        );
        assert!(matches!(
            Address::parse("0xzzc997b66f137c2e6e3e52a56ac8b31d75df1d41"),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn display_is_lowercase() {
        let addr = Address::parse("0xB8C997B66F137C2E6E3E52A56AC8B31D75DF1D41").unwrap();
        assert_eq!(
            addr.to_string(),
            "0xb8c997b66f137c2e6e3e52a56ac8b31d75df1d41"
        );
    }

    #[test]
    fn topic_roundtrip() {
        let addr = Address::new([7u8; 20]);
        let topic = addr.to_topic();
        assert_eq!(&topic[..12], &[0u8; 12]);
        assert_eq!(Address::from_topic(&topic), addr);
    }

    #[test]
    fn serde_uses_hex_string() {
        let addr = Address::new([0xab; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0xabababababababababababababababababababab\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
