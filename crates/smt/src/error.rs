// Path: crates/smt/src/error.rs
//! Error types for the tree kernel.

use canopy_store::StoreError;
use thiserror::Error;

/// Upper bound on accepted key lengths, in bytes.
///
/// Keys are hashed before use, so the bound only rejects pathological
/// inputs before they reach the hash function.
pub const MAX_KEY_LEN: usize = 4096;

/// Errors surfaced by the tree engine.
#[derive(Debug, Error)]
pub enum TreeError {
    /// `delete` was asked for a key that is not in the tree.
    #[error("key not found: {0}")]
    KeyNotFound(String),
    /// The supplied key was empty or longer than [`MAX_KEY_LEN`].
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// A node-store blob matched neither the inner nor the leaf shape.
    #[error("malformed node: {0}")]
    MalformedNode(String),
    /// The backing store surfaced an unexpected failure.
    ///
    /// After a store error during a mutation the in-memory instance is in
    /// an undefined state with respect to the previously published root;
    /// the caller should discard it and reload via
    /// [`SparseMerkleTree::import`](crate::SparseMerkleTree::import).
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// Descent required a node whose digest is absent from the node
    /// store. The tree's reachability invariant is broken; fatal.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
