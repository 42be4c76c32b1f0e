//! Whole file fingerprinting.

use sha1::{Digest, Sha1};

/// A SHA1 hash.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Sha1Hash(pub [u8; 20]);

impl Sha1Hash {
    /// Computes the hash of the given bytes.
    pub fn of(bytes: &[u8]) -> Self {
        Self(Sha1::digest(bytes).into())
    }
}

impl std::fmt::Display for Sha1Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Sha1Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
