// Path: crates/smt/src/tree/verifier.rs
//! Stateless proof verification.

use canopy_crypto::hash::HashFunction;

use crate::bits::{count_common_prefix, get_bit, placeholder};
use crate::node::Node;
use crate::proof::SparseMerkleProof;

/// Check `proof` against `root` for `key` mapping to `value`.
///
/// Pass `Some(value)` to verify membership and `None` to verify
/// non-membership. The check is pure: it touches no store and never
/// fails, evaluating every malformed or contradictory proof to `false`.
/// The hash function must be the one the proving tree was built with.
pub fn verify_proof<H: HashFunction>(
    proof: &SparseMerkleProof,
    root: &[u8],
    key: &[u8],
    value: Option<&[u8]>,
    hasher: &H,
) -> bool {
    let n = hasher.digest_size();
    if root.len() != n || !proof.sanity_check(n) {
        return false;
    }
    let path = hasher.hash(key);

    let mut current = match value {
        Some(value) => {
            // Membership: recompute the leaf digest for (path, H(value)).
            // A proof that also carries an unrelated leaf contradicts
            // itself.
            if proof.non_membership_leaf.is_some() {
                return false;
            }
            let value_hash = hasher.hash(value);
            Node::Leaf {
                path: path.clone(),
                value_hash,
            }
            .digest(hasher)
        }
        None => match &proof.non_membership_leaf {
            // The absent key's descent ended in an empty subtree.
            None => placeholder(n),
            // The absent key's descent ended on a leaf owned by another
            // key. That leaf must parse, must not be the queried key, and
            // must have been routed identically for every proven level.
            Some(leaf_data) => {
                let leaf_path = match Node::decode(leaf_data, n) {
                    Ok(Node::Leaf { path, .. }) => path,
                    _ => return false,
                };
                if leaf_path == path {
                    return false;
                }
                if count_common_prefix(&leaf_path, &path) < proof.side_nodes.len() {
                    return false;
                }
                hasher.hash(leaf_data)
            }
        },
    };

    let levels = proof.side_nodes.len();
    for (i, side) in proof.side_nodes.iter().enumerate() {
        let node = if get_bit(&path, levels - 1 - i) {
            Node::Inner {
                left: side.clone(),
                right: current,
            }
        } else {
            Node::Inner {
                left: current,
                right: side.clone(),
            }
        };
        current = node.digest(hasher);
    }

    current == root
}
