// Path: crates/smt/src/snapshot.rs
//! Whole-tree snapshots.
//!
//! The engine does not mandate a durability format. This wrapper bundles
//! the published root with opaque snapshots of both backing stores so a
//! tree over in-memory stores can be dumped for persistence or transport
//! and rebuilt later. Reconstructing a tree needs nothing beyond the
//! root, the two stores, and the hash function the tree was built with.

use canopy_crypto::hash::HashFunction;
use canopy_store::MemoryStore;
use parity_scale_codec::{Decode, Encode};

use crate::error::TreeError;
use crate::tree::SparseMerkleTree;

/// A serialized tree: the root plus both store snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct TreeSnapshot {
    pub root: Vec<u8>,
    pub nodes: Vec<u8>,
    pub values: Vec<u8>,
}

impl TreeSnapshot {
    /// Capture the state of `tree`.
    pub fn capture<H: HashFunction>(tree: &SparseMerkleTree<H>) -> Result<Self, TreeError> {
        Ok(Self {
            root: tree.root(),
            nodes: tree.node_store().export()?,
            values: tree.value_store().export()?,
        })
    }

    /// Rebuild a [`MemoryStore`]-backed tree from this snapshot.
    ///
    /// `hasher` must be the function the captured tree was built with;
    /// the snapshot does not record it.
    pub fn restore<H: HashFunction>(&self, hasher: H) -> Result<SparseMerkleTree<H>, TreeError> {
        let nodes = MemoryStore::import(&self.nodes)?;
        let values = MemoryStore::import(&self.values)?;
        Ok(SparseMerkleTree::import(
            Box::new(nodes),
            Box::new(values),
            hasher,
            self.root.clone(),
        ))
    }
}
