//! Per-backend hash key defining an id namespace

use std::fmt;

/// A 32-byte BLAKE3 key
///
/// Ids are only comparable between callers hashing with the same seed. A
/// backend draws its seed once at construction and never changes it.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; 32]);

impl Seed {
    /// Draw a fresh random seed
    pub fn generate() -> Self {
        Seed(rand::random())
    }

    /// Use fixed key bytes (deterministic ids across processes)
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Seed(bytes)
    }

    /// Parse a 64-character hex key
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| crate::Error::Config(format!("Invalid seed: {}", e)))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            crate::Error::Config("Invalid seed: expected 32 bytes of hex".into())
        })?;
        Ok(Seed(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short digest naming this namespace without exposing the key
    pub fn fingerprint(&self) -> String {
        let digest = blake3::derive_key("sexpdb seed fingerprint", &self.0);
        hex::encode(&digest[..6])
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({})", self.fingerprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_seeds_differ() {
        assert_ne!(Seed::generate(), Seed::generate());
    }

    #[test]
    fn test_seed_from_hex() {
        let hex = "11".repeat(32);
        let seed = Seed::from_hex(&hex).unwrap();
        assert_eq!(seed.as_bytes(), &[0x11u8; 32]);
        assert!(Seed::from_hex("1122").is_err());
        assert!(Seed::from_hex("zz").is_err());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = Seed::from_bytes([7u8; 32]);
        let b = Seed::from_bytes([7u8; 32]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 12);
        assert_ne!(a.fingerprint(), Seed::from_bytes([8u8; 32]).fingerprint());
    }
}
