// Path: crates/smt/src/proof.rs
//! The proof material produced by `prove` and checked by the verifier.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A Merkle proof for a single key against a single root.
///
/// `side_nodes` holds the sibling digest at each level of the root-to-leaf
/// descent, ordered deepest first: the leaf-adjacent sibling sits at index
/// 0. `non_membership_leaf` is `None` unless the descent for an absent key
/// ended on a leaf owned by a different key that shares the query's path
/// prefix; it then carries that leaf's serialized bytes so the verifier
/// can rebuild the same root without the queried key being present.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct SparseMerkleProof {
    pub side_nodes: Vec<Vec<u8>>,
    pub non_membership_leaf: Option<Vec<u8>>,
}

impl SparseMerkleProof {
    /// Structural limits that hold for any honest proof under an `n`-byte
    /// digest: no more levels than the tree is deep, and every side node
    /// exactly digest-sized.
    pub fn sanity_check(&self, n: usize) -> bool {
        self.side_nodes.len() <= 8 * n && self.side_nodes.iter().all(|s| s.len() == n)
    }
}
