// Path: crates/store/src/memory.rs
//! A `BTreeMap`-backed store for tests and snapshot round-trips.

use parity_scale_codec::{Decode, Encode};
use std::collections::BTreeMap;

use crate::{MapStore, StoreError};

/// A simple in-memory map store.
///
/// Snapshots are the SCALE encoding of the underlying ordered map, so two
/// stores holding the same entries export identical bytes regardless of
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from bytes produced by [`MapStore::export`].
    pub fn import(bytes: &[u8]) -> Result<Self, StoreError> {
        let entries =
            BTreeMap::decode(&mut &*bytes).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(Self { entries })
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MapStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        self.entries.get(key).cloned().ok_or(StoreError::NotFound)
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.entries
            .remove(key)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn export(&self) -> Result<Vec<u8>, StoreError> {
        Ok(self.entries.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_delete() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.get(b"a"), Err(StoreError::NotFound)));

        store.set(b"a", b"1".to_vec()).unwrap();
        assert_eq!(store.get(b"a").unwrap(), b"1");

        store.set(b"a", b"2".to_vec()).unwrap();
        assert_eq!(store.get(b"a").unwrap(), b"2");

        store.delete(b"a").unwrap();
        assert!(matches!(store.get(b"a"), Err(StoreError::NotFound)));
        assert!(matches!(store.delete(b"a"), Err(StoreError::NotFound)));
    }

    #[test]
    fn export_import_round_trip() {
        let mut store = MemoryStore::new();
        store.set(b"x", vec![1, 2, 3]).unwrap();
        store.set(b"y", vec![]).unwrap();

        let snapshot = store.export().unwrap();
        let restored = MemoryStore::import(&snapshot).unwrap();
        assert_eq!(restored, store);
        assert_eq!(restored.get(b"x").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn export_is_insertion_order_independent() {
        let mut a = MemoryStore::new();
        a.set(b"k1", b"v1".to_vec()).unwrap();
        a.set(b"k2", b"v2".to_vec()).unwrap();

        let mut b = MemoryStore::new();
        b.set(b"k2", b"v2".to_vec()).unwrap();
        b.set(b"k1", b"v1".to_vec()).unwrap();

        assert_eq!(a.export().unwrap(), b.export().unwrap());
    }

    #[test]
    fn import_rejects_garbage() {
        // A truncated length prefix cannot decode into a map.
        assert!(matches!(
            MemoryStore::import(&[0xff]),
            Err(StoreError::Decode(_))
        ));
    }
}
