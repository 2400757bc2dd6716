// Path: crates/smt/src/node.rs
//! Wire codec for the two node shapes held in the node store.
//!
//! An inner node is the concatenation of its two child digests, length
//! `2N` for an `N`-byte digest. A leaf is the `0x00` prefix byte followed
//! by the stored key's full path and the digest of its value, length
//! `1 + 2N`. A node's digest is the hash of exactly these bytes, so the
//! leaf prefix together with the differing record lengths keeps leaf
//! digests disjoint from inner digests (up to hash collisions). Changing
//! either shape would silently invalidate every previously issued proof.

use canopy_crypto::hash::HashFunction;

use crate::error::TreeError;

/// Prefix byte opening every serialized leaf.
pub const LEAF_PREFIX: u8 = 0x00;

/// A parsed node-store blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Terminal node carrying the stored key's full path and the digest
    /// of its value.
    Leaf {
        path: Vec<u8>,
        value_hash: Vec<u8>,
    },
    /// Two-child internal node holding the child digests.
    Inner {
        left: Vec<u8>,
        right: Vec<u8>,
    },
}

impl Node {
    /// Canonical byte form; also the preimage of the node's digest.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Node::Leaf { path, value_hash } => {
                let mut data = Vec::with_capacity(1 + path.len() + value_hash.len());
                data.push(LEAF_PREFIX);
                data.extend_from_slice(path);
                data.extend_from_slice(value_hash);
                data
            }
            Node::Inner { left, right } => {
                let mut data = Vec::with_capacity(left.len() + right.len());
                data.extend_from_slice(left);
                data.extend_from_slice(right);
                data
            }
        }
    }

    /// Parse a node-store blob under digest size `n`.
    pub fn decode(bytes: &[u8], n: usize) -> Result<Node, TreeError> {
        if bytes.len() == 2 * n {
            let (left, right) = bytes.split_at(n);
            return Ok(Node::Inner {
                left: left.to_vec(),
                right: right.to_vec(),
            });
        }
        if let Some((&LEAF_PREFIX, rest)) = bytes.split_first() {
            if rest.len() == 2 * n {
                let (path, value_hash) = rest.split_at(n);
                return Ok(Node::Leaf {
                    path: path.to_vec(),
                    value_hash: value_hash.to_vec(),
                });
            }
        }
        Err(TreeError::MalformedNode(format!(
            "blob of {} bytes matches neither node shape",
            bytes.len()
        )))
    }

    /// Whether a blob has the leaf shape: `0x00`-prefixed, length `1 + 2n`.
    pub fn is_leaf(bytes: &[u8], n: usize) -> bool {
        bytes.len() == 1 + 2 * n && bytes.first() == Some(&LEAF_PREFIX)
    }

    /// The node's digest under `hasher`: the hash of its canonical bytes.
    pub fn digest<H: HashFunction>(&self, hasher: &H) -> Vec<u8> {
        hasher.hash(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_crypto::hash::Sha256Hash;

    const N: usize = 32;

    #[test]
    fn leaf_round_trip() {
        let leaf = Node::Leaf {
            path: vec![0xab; N],
            value_hash: vec![0xcd; N],
        };
        let bytes = leaf.encode();
        assert_eq!(bytes.len(), 1 + 2 * N);
        assert_eq!(bytes.first(), Some(&LEAF_PREFIX));
        assert!(Node::is_leaf(&bytes, N));
        assert_eq!(Node::decode(&bytes, N).unwrap(), leaf);
    }

    #[test]
    fn inner_round_trip() {
        let inner = Node::Inner {
            left: vec![0x01; N],
            right: vec![0x02; N],
        };
        let bytes = inner.encode();
        assert_eq!(bytes.len(), 2 * N);
        assert!(!Node::is_leaf(&bytes, N));
        assert_eq!(Node::decode(&bytes, N).unwrap(), inner);
    }

    #[test]
    fn inner_starting_with_zero_byte_is_not_a_leaf() {
        // A left child digest may legitimately begin with 0x00; the record
        // length is what separates the shapes.
        let inner = Node::Inner {
            left: vec![0x00; N],
            right: vec![0x02; N],
        };
        let bytes = inner.encode();
        assert!(!Node::is_leaf(&bytes, N));
        assert!(matches!(
            Node::decode(&bytes, N).unwrap(),
            Node::Inner { .. }
        ));
    }

    #[test]
    fn malformed_blobs_are_rejected() {
        assert!(matches!(
            Node::decode(&[], N),
            Err(TreeError::MalformedNode(_))
        ));
        assert!(matches!(
            Node::decode(&vec![0u8; 2 * N - 1], N),
            Err(TreeError::MalformedNode(_))
        ));
        // Leaf length but wrong prefix.
        let mut bad = vec![0x01];
        bad.extend_from_slice(&[0u8; 2 * N]);
        assert!(matches!(
            Node::decode(&bad, N),
            Err(TreeError::MalformedNode(_))
        ));
    }

    #[test]
    fn leaf_and_inner_digests_differ_for_same_payload() {
        let payload_a = vec![0x11; N];
        let payload_b = vec![0x22; N];
        let leaf = Node::Leaf {
            path: payload_a.clone(),
            value_hash: payload_b.clone(),
        };
        let inner = Node::Inner {
            left: payload_a,
            right: payload_b,
        };
        assert_ne!(leaf.digest(&Sha256Hash), inner.digest(&Sha256Hash));
    }
}
