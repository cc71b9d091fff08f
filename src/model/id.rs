//! Identifiers for stored values

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ID_LEN: usize = 32;

/// Keyed BLAKE3 digest of a value
///
/// Ids only compare meaningfully within one seed's namespace: the same
/// value hashed under two seeds gives unrelated ids.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Id([u8; ID_LEN]);

impl Id {
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Full lowercase hex form, as printed by the CLI
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the full hex form; anything else is [`Error::InvalidId`]
    pub fn from_hex(text: &str) -> Result<Self> {
        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(text, &mut bytes).map_err(|_| Error::InvalidId(text.to_string()))?;
        Ok(Id(bytes))
    }

    /// First four bytes in hex, for logs and messages
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl From<blake3::Hash> for Id {
    fn from(hash: blake3::Hash) -> Self {
        Id(*hash.as_bytes())
    }
}

impl FromStr for Id {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Id::from_hex(text)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Id {
        Id::from(blake3::keyed_hash(&[7u8; 32], b"(a b)"))
    }

    #[test]
    fn test_hex_form_parses_back() {
        let id = sample();
        assert_eq!(id.to_hex().len(), 64);
        assert_eq!(id.to_hex().parse::<Id>().unwrap(), id);
    }

    #[test]
    fn test_bad_hex_is_invalid_id() {
        let too_long = "0".repeat(66);
        for text in ["abcd", "not hex", too_long.as_str()] {
            match Id::from_hex(text) {
                Err(Error::InvalidId(got)) => assert_eq!(got, text),
                other => panic!("expected InvalidId, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_short_is_hex_prefix() {
        let id = sample();
        assert_eq!(id.short().len(), 8);
        assert!(id.to_hex().starts_with(&id.short()));
        assert_eq!(format!("{:?}", id), format!("Id({})", id.short()));
    }
}
