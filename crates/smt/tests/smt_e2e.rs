// Path: crates/smt/tests/smt_e2e.rs
//! End-to-end scenarios for the tree kernel over SHA-256.

use anyhow::Result;
use canopy_smt::prelude::*;
use parity_scale_codec::{Decode, Encode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

#[test]
fn basic_insert_and_lookup() -> Result<()> {
    let mut tree = SparseMerkleTree::with_sha256();
    tree.update(b"foo", b"bar")?;
    assert_eq!(tree.get(b"foo")?, Some(b"bar".to_vec()));
    assert_eq!(tree.get(b"baz")?, None);
    Ok(())
}

#[test]
fn membership_proof_binds_key_and_value() -> Result<()> {
    let mut tree = SparseMerkleTree::with_sha256();
    tree.update(b"foo", b"bar")?;
    let root = tree.root();

    let proof = tree.prove(b"foo")?;
    assert!(verify_proof(&proof, &root, b"foo", Some(b"bar"), &Sha256Hash));
    assert!(!verify_proof(&proof, &root, b"foo", Some(b"baz"), &Sha256Hash));
    Ok(())
}

#[test]
fn non_membership_proof_for_an_absent_key() -> Result<()> {
    let mut tree = SparseMerkleTree::with_sha256();
    tree.update(b"foo", b"bar")?;
    let root = tree.root();

    let proof = tree.prove(b"baz")?;
    assert!(verify_proof(&proof, &root, b"baz", None, &Sha256Hash));
    assert!(!verify_proof(&proof, &root, b"baz", Some(b"bar"), &Sha256Hash));
    Ok(())
}

#[test]
fn root_depends_only_on_the_final_map() -> Result<()> {
    let mut tree = SparseMerkleTree::with_sha256();
    tree.update(b"a", b"1")?;
    tree.update(b"b", b"2")?;
    tree.update(b"a", b"3")?;
    tree.delete(b"b")?;
    assert_eq!(tree.get(b"a")?, Some(b"3".to_vec()));
    assert_eq!(tree.get(b"b")?, None);

    let mut fresh = SparseMerkleTree::with_sha256();
    fresh.update(b"a", b"3")?;
    assert_eq!(tree.root(), fresh.root());
    Ok(())
}

#[test]
fn thousand_random_keys_drain_to_the_empty_root() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut seen = HashSet::new();
    let mut keys: Vec<[u8; 32]> = Vec::with_capacity(1000);
    while keys.len() < 1000 {
        let key: [u8; 32] = rng.gen();
        if seen.insert(key) {
            keys.push(key);
        }
    }

    let empty_root = SparseMerkleTree::with_sha256().root();
    let mut tree = SparseMerkleTree::with_sha256();
    for (i, key) in keys.iter().enumerate() {
        tree.update(key, &i.to_be_bytes())?;
    }
    assert!(!tree.is_empty());

    for key in keys.iter().rev() {
        tree.delete(key)?;
    }
    assert_eq!(tree.root(), empty_root);
    assert!(tree.is_empty());
    Ok(())
}

#[test]
fn snapshot_survives_the_wire() -> Result<()> {
    let mut tree = SparseMerkleTree::with_sha256();
    tree.update(b"foo", b"bar")?;
    let root = tree.root();

    let wire = TreeSnapshot::capture(&tree)?.encode();
    let restored = TreeSnapshot::decode(&mut &*wire)?.restore(Sha256Hash)?;

    assert_eq!(restored.root(), root);
    assert_eq!(restored.get(b"foo")?, Some(b"bar".to_vec()));

    let proof = restored.prove(b"foo")?;
    assert!(verify_proof(&proof, &restored.root(), b"foo", Some(b"bar"), &Sha256Hash));
    Ok(())
}

#[test]
fn interleaved_mutations_stay_consistent() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut tree = SparseMerkleTree::with_sha256();
    let mut shadow = std::collections::BTreeMap::new();

    for round in 0..500u32 {
        let key = format!("key-{}", rng.gen_range(0..100)).into_bytes();
        if rng.gen_bool(0.7) || !shadow.contains_key(&key) {
            let value = format!("value-{round}").into_bytes();
            tree.update(&key, &value)?;
            shadow.insert(key, value);
        } else {
            tree.delete(&key)?;
            shadow.remove(&key);
        }
    }

    let root = tree.root();
    for (key, value) in &shadow {
        assert_eq!(tree.get(key)?, Some(value.clone()));
        let proof = tree.prove(key)?;
        assert!(verify_proof(&proof, &root, key, Some(value), &Sha256Hash));
    }
    for i in 100..120 {
        let absent = format!("key-{i}").into_bytes();
        assert_eq!(tree.get(&absent)?, None);
        let proof = tree.prove(&absent)?;
        assert!(verify_proof(&proof, &root, &absent, None, &Sha256Hash));
    }
    Ok(())
}
