// Path: crates/crypto/src/hash/mod.rs
//! Implementations of cryptographic hash functions

use sha2::{Digest, Sha256, Sha512};


/// A cryptographic hash function.
///
/// Proofs carry no record of which function produced them, so a prover
/// and a verifier must be configured with the same implementation.
pub trait HashFunction {
    /// Hash a message and return the digest.
    fn hash(&self, message: &[u8]) -> Vec<u8>;

    /// Get the digest size in bytes.
    fn digest_size(&self) -> usize;

    /// Get the name of the hash function.
    fn name(&self) -> &str {
        "unknown-hash"
    }
}

/// SHA-256 hash function implementation
#[derive(Default, Clone, Copy)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    fn hash(&self, message: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(message);
        hasher.finalize().to_vec()
    }

    fn digest_size(&self) -> usize {
        32
    }

    fn name(&self) -> &str {
        "SHA-256"
    }
}

/// SHA-512 hash function implementation
#[derive(Default, Clone, Copy)]
pub struct Sha512Hash;

impl HashFunction for Sha512Hash {
    fn hash(&self, message: &[u8]) -> Vec<u8> {
        let mut hasher = Sha512::new();
        hasher.update(message);
        hasher.finalize().to_vec()
    }

    fn digest_size(&self) -> usize {
        64
    }

    fn name(&self) -> &str {
        "SHA-512"
    }
}
