//! Account address newtype with strict syntactic validation.
//!
//! Addresses use a fixed human-readable prefix, a `1` separator, and a
//! 38-character data part drawn from the bech32 alphabet (the same shape
//! as a 20-byte account address in bech32 encoding). Validation is purely
//! syntactic; checksums and key material live behind the submission
//! capability, not in the harness.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Human-readable prefix for all ledger addresses.
pub const ADDRESS_HRP: &str = "ldg";

/// Length of the data part following the `1` separator.
pub const ADDRESS_DATA_LEN: usize = 38;

/// The bech32 data alphabet (no `1`, `b`, `i`, or `o`).
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// A syntactically valid ledger address.
///
/// Construction always goes through [`Address::parse`] (or serde, which
/// routes through the same check), so holding an `Address` is proof the
/// string has the right shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

/// Why a string failed to parse as an [`Address`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// No `1` separator between prefix and data.
    #[error("missing '1' separator")]
    MissingSeparator,

    /// The prefix before the separator is not [`ADDRESS_HRP`].
    #[error("unknown prefix '{found}' (expected '{ADDRESS_HRP}')")]
    WrongPrefix { found: String },

    /// The data part has the wrong length.
    #[error("data part is {len} characters (expected {ADDRESS_DATA_LEN})")]
    BadLength { len: usize },

    /// The data part contains a character outside the bech32 alphabet.
    #[error("invalid character '{ch}' at data position {pos}")]
    InvalidChar { ch: char, pos: usize },
}

impl Address {
    /// Parse and validate an address string.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        // rfind: the data alphabet itself never contains '1', so the last
        // '1' is always the separator.
        let sep = s.rfind('1').ok_or(AddressError::MissingSeparator)?;
        let (hrp, data) = (&s[..sep], &s[sep + 1..]);
        if hrp != ADDRESS_HRP {
            return Err(AddressError::WrongPrefix {
                found: hrp.to_owned(),
            });
        }
        if data.len() != ADDRESS_DATA_LEN {
            return Err(AddressError::BadLength { len: data.len() });
        }
        for (pos, ch) in data.chars().enumerate() {
            if !ch.is_ascii() || !CHARSET.contains(&(ch as u8)) {
                return Err(AddressError::InvalidChar { ch, pos });
            }
        }
        Ok(Self(s.to_owned()))
    }

    /// Deterministically derive an address from arbitrary seed material.
    ///
    /// The same material always yields the same address. Used for harness
    /// account fixtures; real deployments derive addresses from keys behind
    /// the submission capability.
    #[must_use]
    pub fn derive(material: &[u8]) -> Self {
        let mut out = String::with_capacity(ADDRESS_HRP.len() + 1 + ADDRESS_DATA_LEN);
        out.push_str(ADDRESS_HRP);
        out.push('1');

        // Each 64-bit hash word yields twelve 5-bit symbols.
        let mut word = 0u64;
        let mut symbols_left = 0u32;
        let mut counter = 0u64;
        for _ in 0..ADDRESS_DATA_LEN {
            if symbols_left == 0 {
                word = xxh3_64_with_seed(material, counter);
                symbols_left = 12;
                counter += 1;
            }
            let idx = (word & 0x1f) as usize;
            out.push(char::from(CHARSET[idx]));
            word >>= 5;
            symbols_left -= 1;
        }
        Self(out)
    }

    /// The full address string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_addresses_parse() {
        let addr = Address::derive(b"fixture-0");
        let reparsed = Address::parse(addr.as_str()).expect("derived address must parse");
        assert_eq!(addr, reparsed);
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(Address::derive(b"same"), Address::derive(b"same"));
        assert_ne!(Address::derive(b"one"), Address::derive(b"two"));
    }

    #[test]
    fn shape_is_fixed() {
        let addr = Address::derive(b"shape");
        assert_eq!(addr.as_str().len(), ADDRESS_HRP.len() + 1 + ADDRESS_DATA_LEN);
        assert!(addr.as_str().starts_with("ldg1"));
    }

    #[test]
    fn rejects_missing_separator() {
        assert_eq!(
            Address::parse("ldgqqqqq"),
            Err(AddressError::MissingSeparator)
        );
    }

    #[test]
    fn rejects_wrong_prefix() {
        let data = "q".repeat(ADDRESS_DATA_LEN);
        assert_eq!(
            Address::parse(&format!("xyz1{data}")),
            Err(AddressError::WrongPrefix {
                found: "xyz".to_owned()
            })
        );
    }

    #[test]
    fn rejects_bad_length() {
        assert_eq!(
            Address::parse("ldg1qqq"),
            Err(AddressError::BadLength { len: 3 })
        );
    }

    #[test]
    fn rejects_invalid_character() {
        // 'b' is not in the bech32 alphabet.
        let data = "b".repeat(ADDRESS_DATA_LEN);
        assert_eq!(
            Address::parse(&format!("ldg1{data}")),
            Err(AddressError::InvalidChar { ch: 'b', pos: 0 })
        );
    }

    #[test]
    fn serde_round_trip() {
        let addr = Address::derive(b"serde");
        let json = serde_json::to_string(&addr).expect("serialize");
        let back: Address = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(addr, back);
    }

    #[test]
    fn serde_rejects_malformed() {
        let result: Result<Address, _> = serde_json::from_str("\"ldg1short\"");
        assert!(result.is_err());
    }
}
