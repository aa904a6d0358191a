// Content Digest
//
// SHA-512/224 of the body, truncated to the first 16 bytes, lowercase hex.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512_224};

/// Bytes kept from the SHA-512/224 output
pub const DIGEST_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    pub fn of(body: &str) -> Self {
        let sum = Sha512_224::digest(body.as_bytes());
        Self(hex::encode(&sum[..DIGEST_LEN]))
    }

    /// Wrap a digest that was computed elsewhere (caller-supplied or stored)
    pub fn from_hex(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_32_hex_chars() {
        let digest = ContentDigest::of("Hello {{.Name}}");
        assert_eq!(digest.as_str().len(), DIGEST_LEN * 2);
        assert!(digest.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_is_truncated_prefix_of_full_hash() {
        let full = hex::encode(Sha512_224::digest(b"A"));
        assert_eq!(full.len(), 56);
        assert!(full.starts_with(ContentDigest::of("A").as_str()));
    }

    #[test]
    fn test_digest_tracks_content() {
        assert_eq!(ContentDigest::of("A"), ContentDigest::of("A"));
        assert_ne!(ContentDigest::of("A"), ContentDigest::of("B"));
        assert_ne!(ContentDigest::of(""), ContentDigest::of(" "));
    }
}
