// Path: crates/store/src/lib.rs

#![forbid(unsafe_code)]
//! # Canopy Store
//!
//! The key-value capability the tree engine persists its nodes and values
//! through, plus an in-memory implementation used by tests and snapshots.
//! Production deployments substitute their own disk- or network-backed
//! implementation behind the same trait.

pub mod memory;

pub use memory::MemoryStore;

use thiserror::Error;

/// Represents errors that can occur within a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested key was not found in the store.
    #[error("not found")]
    NotFound,
    /// A generic error originating from the underlying backend.
    #[error("backend error: {0}")]
    Backend(String),
    /// An error occurred while serializing data for a snapshot.
    #[error("encode error: {0}")]
    Encode(String),
    /// An error occurred while deserializing snapshot data.
    #[error("decode error: {0}")]
    Decode(String),
}

/// A key-value store consumed by the tree engine.
///
/// The engine only ever passes digest-sized keys. Implementations must
/// report a missing key as [`StoreError::NotFound`], distinguishable from
/// every other failure: the engine relies on that distinction to tell an
/// absent entry apart from a broken backend.
pub trait MapStore {
    /// Get the value for a key.
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError>;

    /// Set the value for a key, overwriting any previous value.
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    /// Delete a key. Fails with [`StoreError::NotFound`] if it is absent.
    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// Export the whole store as an opaque snapshot.
    ///
    /// The wire format is a private concern of the implementation; it is
    /// only required to round-trip through the matching import routine
    /// owned by the same implementation.
    fn export(&self) -> Result<Vec<u8>, StoreError>;
}
