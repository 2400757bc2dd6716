// Path: crates/smt/src/tree/mod.rs
//! The sparse Merkle tree engine.
//!
//! The engine walks the collapsed tree held in the node store: descent
//! from the root follows the key's path bits through inner nodes until it
//! reaches a leaf or the placeholder digest of an empty subtree, and
//! mutation rebuilds the digests along that walk bottom-up. Inner nodes
//! orphaned by a mutation are left in the node store; the store is
//! append-only for nodes. Value-store entries of deleted keys are
//! removed.
//!
//! The engine is single-writer. A mutation must not overlap another
//! mutation on the same instance, which `&mut self` encodes; readers may
//! share the instance only while no writer runs, because intermediate
//! node writes during an update are visible to concurrent descents.

pub mod verifier;


use canopy_crypto::hash::{HashFunction, Sha256Hash};
use canopy_store::{MapStore, MemoryStore, StoreError};

use crate::bits::{count_common_prefix, get_bit, placeholder};
use crate::error::{TreeError, MAX_KEY_LEN};
use crate::node::Node;
use crate::proof::SparseMerkleProof;

/// An authenticated key-value map committing to a single root digest.
///
/// Keys are hashed to derive their tree path, so callers cannot influence
/// the layout of either backing store. The empty value is the tombstone:
/// writing it through [`update`](Self::update) deletes the key, and reads
/// of absent keys return `None`.
pub struct SparseMerkleTree<H: HashFunction> {
    nodes: Box<dyn MapStore>,
    values: Box<dyn MapStore>,
    hasher: H,
    root: Vec<u8>,
}

impl<H: HashFunction> std::fmt::Debug for SparseMerkleTree<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseMerkleTree")
            .field("root", &hex::encode(&self.root))
            .field("hash", &self.hasher.name())
            .finish()
    }
}

/// The record of one root-to-leaf walk.
struct Descent {
    /// Sibling digest at each level, deepest first.
    side_nodes: Vec<Vec<u8>>,
    /// Digest of the node the walk ended on: a leaf, or the placeholder.
    terminal_hash: Vec<u8>,
    /// Serialized bytes of the leaf the walk ended on, if any.
    terminal_leaf: Option<Vec<u8>>,
}

impl SparseMerkleTree<Sha256Hash> {
    /// A SHA-256 tree over fresh in-memory stores.
    pub fn with_sha256() -> Self {
        Self::new(
            Box::new(MemoryStore::new()),
            Box::new(MemoryStore::new()),
            Sha256Hash,
        )
    }
}

impl<H: HashFunction> SparseMerkleTree<H> {
    /// Create an empty tree over the given stores; the root is the
    /// placeholder digest.
    pub fn new(nodes: Box<dyn MapStore>, values: Box<dyn MapStore>, hasher: H) -> Self {
        let root = placeholder(hasher.digest_size());
        Self {
            nodes,
            values,
            hasher,
            root,
        }
    }

    /// Resume a tree at a previously published root over pre-populated
    /// stores.
    pub fn import(
        nodes: Box<dyn MapStore>,
        values: Box<dyn MapStore>,
        hasher: H,
        root: Vec<u8>,
    ) -> Self {
        Self {
            nodes,
            values,
            hasher,
            root,
        }
    }

    /// The current root digest, by value.
    pub fn root(&self) -> Vec<u8> {
        self.root.clone()
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root == self.placeholder()
    }

    pub(crate) fn node_store(&self) -> &dyn MapStore {
        self.nodes.as_ref()
    }

    pub(crate) fn value_store(&self) -> &dyn MapStore {
        self.values.as_ref()
    }

    fn placeholder(&self) -> Vec<u8> {
        placeholder(self.hasher.digest_size())
    }

    fn depth(&self) -> usize {
        8 * self.hasher.digest_size()
    }

    fn check_key(&self, key: &[u8]) -> Result<(), TreeError> {
        if key.is_empty() {
            return Err(TreeError::InvalidKey("empty key".into()));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(TreeError::InvalidKey(format!(
                "key of {} bytes exceeds the {} byte bound",
                key.len(),
                MAX_KEY_LEN
            )));
        }
        Ok(())
    }

    /// Fetch a node blob that the tree structure says must exist.
    fn node_blob(&self, digest: &[u8]) -> Result<Vec<u8>, TreeError> {
        match self.nodes.get(digest) {
            Ok(blob) => Ok(blob),
            Err(StoreError::NotFound) => {
                log::error!(
                    "node {} is referenced by the tree but missing from the node store",
                    hex::encode(digest)
                );
                Err(TreeError::InvariantViolation(format!(
                    "missing node {}",
                    hex::encode(digest)
                )))
            }
            Err(e) => Err(TreeError::Store(e)),
        }
    }

    /// Walk from the root towards the leaf position of `path`, recording
    /// the sibling digest at every level. The walk stops at the first
    /// placeholder child or at a leaf; side nodes come back deepest first.
    fn descend(&self, path: &[u8]) -> Result<Descent, TreeError> {
        let n = self.hasher.digest_size();
        let ph = self.placeholder();
        let mut side_nodes = Vec::new();

        if self.root == ph {
            return Ok(Descent {
                side_nodes,
                terminal_hash: ph,
                terminal_leaf: None,
            });
        }

        let mut current_hash = self.root.clone();
        let mut current_blob = self.node_blob(&current_hash)?;
        if Node::is_leaf(&current_blob, n) {
            return Ok(Descent {
                side_nodes,
                terminal_hash: current_hash,
                terminal_leaf: Some(current_blob),
            });
        }

        let mut terminal_leaf = None;
        for depth in 0..self.depth() {
            let (left, right) = match Node::decode(&current_blob, n)? {
                Node::Inner { left, right } => (left, right),
                // The blob was checked to not be a leaf before this turn.
                Node::Leaf { .. } => break,
            };
            let (next, side) = if get_bit(path, depth) {
                (right, left)
            } else {
                (left, right)
            };
            side_nodes.push(side);

            if next == ph {
                current_hash = ph;
                break;
            }
            current_blob = self.node_blob(&next)?;
            current_hash = next;
            if Node::is_leaf(&current_blob, n) {
                terminal_leaf = Some(current_blob);
                break;
            }
        }

        side_nodes.reverse();
        Ok(Descent {
            side_nodes,
            terminal_hash: current_hash,
            terminal_leaf,
        })
    }

    /// Point lookup. Returns `Ok(None)` for keys not in the tree.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, TreeError> {
        self.check_key(key)?;
        let n = self.hasher.digest_size();
        let path = self.hasher.hash(key);
        let ph = self.placeholder();

        let mut current = self.root.clone();
        let mut depth = 0usize;
        loop {
            if current == ph {
                return Ok(None);
            }
            if depth > self.depth() {
                return Err(TreeError::InvariantViolation(
                    "descent exceeded the tree depth".into(),
                ));
            }
            let blob = self.node_blob(&current)?;
            match Node::decode(&blob, n)? {
                Node::Leaf {
                    path: leaf_path, ..
                } => {
                    if leaf_path != path {
                        return Ok(None);
                    }
                    return match self.values.get(&path) {
                        Ok(value) => Ok(Some(value)),
                        Err(StoreError::NotFound) => Err(TreeError::InvariantViolation(format!(
                            "value for path {} missing from the value store",
                            hex::encode(&path)
                        ))),
                        Err(e) => Err(TreeError::Store(e)),
                    };
                }
                Node::Inner { left, right } => {
                    current = if get_bit(&path, depth) { right } else { left };
                    depth += 1;
                }
            }
        }
    }

    /// Whether `key` is present in the tree.
    pub fn has(&self, key: &[u8]) -> Result<bool, TreeError> {
        Ok(self.get(key)?.is_some())
    }

    /// Insert or overwrite `key` with `value` and return the new root.
    ///
    /// The empty value is the tombstone and is reinterpreted as
    /// [`delete`](Self::delete). Nodes are written bottom-up as they are
    /// recomputed and the root is published only on success; on a store
    /// error partial writes may remain, and the caller should discard the
    /// instance and reload via [`import`](Self::import) from the last
    /// known-good root. Nodes made unreachable by the update are not
    /// collected.
    pub fn update(&mut self, key: &[u8], value: &[u8]) -> Result<Vec<u8>, TreeError> {
        self.check_key(key)?;
        if value.is_empty() {
            return self.delete(key);
        }
        let path = self.hasher.hash(key);
        let descent = self.descend(&path)?;
        let new_root = self.write_leaf(&path, value, &descent)?;
        self.values.set(&path, value.to_vec())?;
        self.root = new_root.clone();
        Ok(new_root)
    }

    /// Remove `key` from the tree and return the new root.
    ///
    /// Fails with [`TreeError::KeyNotFound`] when the key is absent.
    /// Deleting the last key returns the tree to the placeholder root.
    pub fn delete(&mut self, key: &[u8]) -> Result<Vec<u8>, TreeError> {
        self.check_key(key)?;
        let n = self.hasher.digest_size();
        let path = self.hasher.hash(key);
        let descent = self.descend(&path)?;

        let old_leaf = descent
            .terminal_leaf
            .as_deref()
            .ok_or_else(|| TreeError::KeyNotFound(hex::encode(key)))?;
        match Node::decode(old_leaf, n)? {
            Node::Leaf {
                path: leaf_path, ..
            } if leaf_path == path => {}
            _ => return Err(TreeError::KeyNotFound(hex::encode(key))),
        }

        let new_root = self.remove_leaf(&path, &descent)?;
        match self.values.delete(&path) {
            Ok(()) => {}
            Err(StoreError::NotFound) => {
                return Err(TreeError::InvariantViolation(format!(
                    "value for path {} missing from the value store",
                    hex::encode(&path)
                )))
            }
            Err(e) => return Err(TreeError::Store(e)),
        }
        self.root = new_root.clone();
        Ok(new_root)
    }

    /// Produce a membership or non-membership proof for `key` against the
    /// current root.
    pub fn prove(&self, key: &[u8]) -> Result<SparseMerkleProof, TreeError> {
        self.check_key(key)?;
        let n = self.hasher.digest_size();
        let path = self.hasher.hash(key);
        let Descent {
            side_nodes,
            terminal_leaf,
            ..
        } = self.descend(&path)?;

        let non_membership_leaf = match terminal_leaf {
            Some(leaf_data) => match Node::decode(&leaf_data, n)? {
                Node::Leaf {
                    path: leaf_path, ..
                } if leaf_path != path => Some(leaf_data),
                _ => None,
            },
            None => None,
        };

        Ok(SparseMerkleProof {
            side_nodes,
            non_membership_leaf,
        })
    }

    /// Serialize an inner node, write it under its digest, and return the
    /// digest.
    fn write_inner(&mut self, left: Vec<u8>, right: Vec<u8>) -> Result<Vec<u8>, TreeError> {
        let data = Node::Inner { left, right }.encode();
        let digest = self.hasher.hash(&data);
        self.nodes.set(&digest, data)?;
        Ok(digest)
    }

    /// Place the new leaf for `path` and rebuild the digests above it.
    fn write_leaf(
        &mut self,
        path: &[u8],
        value: &[u8],
        descent: &Descent,
    ) -> Result<Vec<u8>, TreeError> {
        let n = self.hasher.digest_size();
        let depth = self.depth();
        let ph = self.placeholder();

        let value_hash = self.hasher.hash(value);
        let leaf_data = Node::Leaf {
            path: path.to_vec(),
            value_hash,
        }
        .encode();
        let mut current = self.hasher.hash(&leaf_data);
        self.nodes.set(&current, leaf_data)?;

        // When the descent ended on a leaf owned by a different key, the
        // two leaves diverge at the first differing path bit: an inner
        // node pairing them is created there, and the levels between that
        // bit and the old descent depth are filled with placeholders.
        let common_prefix = match &descent.terminal_leaf {
            None => depth,
            Some(old_leaf) => match Node::decode(old_leaf, n)? {
                Node::Leaf {
                    path: old_path, ..
                } => count_common_prefix(&old_path, path),
                Node::Inner { .. } => {
                    return Err(TreeError::MalformedNode(
                        "descent terminated on an inner node".into(),
                    ))
                }
            },
        };
        if common_prefix != depth {
            let (left, right) = if get_bit(path, common_prefix) {
                (descent.terminal_hash.clone(), current)
            } else {
                (current, descent.terminal_hash.clone())
            };
            current = self.write_inner(left, right)?;
        }

        let offset = depth - descent.side_nodes.len();
        for i in 0..depth {
            let side = if i < offset {
                if common_prefix != depth && common_prefix > depth - 1 - i {
                    ph.clone()
                } else {
                    continue;
                }
            } else {
                match descent.side_nodes.get(i - offset) {
                    Some(side) => side.clone(),
                    None => continue,
                }
            };
            let (left, right) = if get_bit(path, depth - 1 - i) {
                (side, current)
            } else {
                (current, side)
            };
            current = self.write_inner(left, right)?;
        }

        Ok(current)
    }

    /// Drop the leaf at `path` and collapse the structure above it.
    ///
    /// Ascending from the vacated position: a sibling leaf is promoted
    /// past every level whose other child is empty, a sibling inner node
    /// stays put and the vacated side becomes a placeholder. The first
    /// level with two non-trivial children stops the collapse and normal
    /// digest recomputation resumes from there.
    fn remove_leaf(&mut self, path: &[u8], descent: &Descent) -> Result<Vec<u8>, TreeError> {
        let n = self.hasher.digest_size();
        let ph = self.placeholder();
        let levels = descent.side_nodes.len();

        let mut current = ph.clone();
        let mut seeded = false;
        let mut non_placeholder_reached = false;

        for (i, side) in descent.side_nodes.iter().enumerate() {
            if !seeded {
                seeded = true;
                if side == &ph {
                    // A leaf's sibling can never be empty: the parent
                    // would have collapsed when it was formed.
                    return Err(TreeError::InvariantViolation(
                        "deleted leaf had a placeholder sibling".into(),
                    ));
                }
                if Node::is_leaf(&self.node_blob(side)?, n) {
                    // The sibling leaf bubbles up through the collapse.
                    current = side.clone();
                    continue;
                }
                // The sibling subtree stays; the vacated side is empty.
                non_placeholder_reached = true;
            }

            if !non_placeholder_reached && side == &ph {
                // Still ascending a collapsed chain of empty subtrees.
                continue;
            }
            non_placeholder_reached = true;

            let (left, right) = if get_bit(path, levels - 1 - i) {
                (side.clone(), current)
            } else {
                (current, side.clone())
            };
            current = self.write_inner(left, right)?;
        }

        Ok(current)
    }
}
