//! 20-byte account addresses with EIP-55 checksum display

use crate::namehash::keccak256;
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Ethereum-style address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// The zero address
    pub const ZERO: Address = Address([0u8; 20]);

    /// Wrap raw bytes
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Parse hex, with or without `0x`, in any letter case.
    ///
    /// Mixed-case input is not checked against its checksum; use
    /// [`Address::parse_checksummed`] when that matters.
    pub fn parse(s: &str) -> Result<Self> {
        let digits = hex_digits(s);
        if digits.len() != 40 {
            return Err(Error::InvalidAddress(format!(
                "expected 40 hex digits, got {}: {}",
                digits.len(),
                s
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", s, e)))?;
        Ok(Address(bytes))
    }

    /// Parse and, for mixed-case input, verify the EIP-55 checksum
    pub fn parse_checksummed(s: &str) -> Result<Self> {
        let address = Self::parse(s)?;
        let digits = hex_digits(s);
        let all_lower = digits.chars().all(|c| !c.is_ascii_uppercase());
        let all_upper = digits.chars().all(|c| !c.is_ascii_lowercase());
        if !all_lower && !all_upper && address.to_checksum()[2..] != *digits {
            return Err(Error::InvalidAddress(format!("bad checksum: {}", s)));
        }
        Ok(address)
    }

    /// EIP-55 mixed-case hex
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Lowercase hex without the `0x` prefix
    pub fn to_lower_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Hex digits of `s` without surrounding whitespace or one `0x`/`0X` prefix
fn hex_digits(s: &str) -> &str {
    let trimmed = s.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}
