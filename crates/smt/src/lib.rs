// Path: crates/smt/src/lib.rs

#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # Canopy SMT
//!
//! A sparse Merkle tree: an authenticated key-value map in which every
//! possible key of the driving hash's output space implicitly occupies a
//! leaf, and membership or non-membership of any key can be proven
//! against a single digest-sized root.
//!
//! The conceptually complete binary tree of depth `8 * N` (for an
//! `N`-byte digest) is never materialized. Empty subtrees collapse into
//! the all-zero placeholder digest, so the node store holds on the order
//! of `k * log k` entries for `k` keys. Nodes live in a caller-supplied
//! key-value store, addressed by their own digest; values live in a
//! second store, addressed by the hash of their key.
//!
//! ```
//! use canopy_smt::prelude::*;
//!
//! let mut tree = SparseMerkleTree::with_sha256();
//! tree.update(b"foo", b"bar")?;
//! assert_eq!(tree.get(b"foo")?, Some(b"bar".to_vec()));
//!
//! let proof = tree.prove(b"foo")?;
//! assert!(verify_proof(&proof, &tree.root(), b"foo", Some(b"bar"), &Sha256Hash));
//! # Ok::<(), canopy_smt::TreeError>(())
//! ```

pub mod bits;
pub mod error;
pub mod node;
pub mod proof;
pub mod snapshot;
pub mod tree;

pub use error::{TreeError, MAX_KEY_LEN};
pub use proof::SparseMerkleProof;
pub use snapshot::TreeSnapshot;
pub use tree::verifier::verify_proof;
pub use tree::SparseMerkleTree;

/// A prelude for easily importing the most common types.
pub mod prelude {
    pub use crate::tree::verifier::verify_proof;
    pub use crate::tree::SparseMerkleTree;
    pub use crate::{SparseMerkleProof, TreeError, TreeSnapshot};
    pub use canopy_crypto::hash::{HashFunction, Sha256Hash, Sha512Hash};
    pub use canopy_store::{MapStore, MemoryStore, StoreError};
}
