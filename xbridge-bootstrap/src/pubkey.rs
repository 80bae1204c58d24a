//! 32-byte ledger identifiers and their base58 string form.

use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Base58 rendering of the all-zero identifier.
pub const PLACEHOLDER_ID: &str = "11111111111111111111111111111111";

/// Errors produced while parsing a base58 identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsePubkeyError {
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("identifier must be 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// A 32-byte on-chain address.
///
/// Borsh encodes it as the raw 32 bytes with no length prefix, which is what
/// the bootstrap and guardian layouts expect.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, BorshDeserialize,
)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    /// Encoded size in bytes.
    pub const LEN: usize = 32;

    /// The all-zero identifier used as the fallback value.
    pub const PLACEHOLDER: Pubkey = Pubkey([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Whether this is the all-zero placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl FromStr for Pubkey {
    type Err = ParsePubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s.trim())
            .into_vec()
            .map_err(|e| ParsePubkeyError::InvalidBase58(e.to_string()))?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParsePubkeyError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
