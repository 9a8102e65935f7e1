//! Provider identity
//!
//! Liquidity positions and custody balances are keyed by a full 20-byte
//! account identity, serialized as a `0x`-prefixed hex string so it can be
//! used as a JSON map key.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentityError {
    #[error("Invalid hex in account id {input:?}: {source}")]
    InvalidHex {
        input: String,
        source: hex::FromHexError,
    },

    #[error("Account id must be 20 bytes, got {got}")]
    WrongLength { got: usize },
}

/// Identity of a liquidity provider or trader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; 20]);

impl AccountId {
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(input: &str) -> Result<Self, IdentityError> {
        let stripped = input.strip_prefix("0x").unwrap_or(input);
        let bytes = hex::decode(stripped).map_err(|source| IdentityError::InvalidHex {
            input: input.to_string(),
            source,
        })?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| IdentityError::WrongLength { got: b.len() })?;
        Ok(Self(bytes))
    }

    /// Deterministic test/demo identity from a small seed.
    pub fn from_seed(seed: u8) -> Self {
        Self([seed; 20])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

struct AccountIdVisitor;

impl Visitor<'_> for AccountIdVisitor {
    type Value = AccountId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 20-byte hex account id")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<AccountId, E> {
        AccountId::from_hex(value).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(AccountIdVisitor)
    }
}
