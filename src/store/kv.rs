//! Key-value storage handle
//!
//! The header store runs over whatever transactional key-value scope the
//! enclosing ledger hands it. `MemKvStore` backs tests and embedded use;
//! `SledKvStore` persists the standalone daemon's copy to disk.

use sled::{Db, Tree};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Storage errors - backend failures propagate verbatim
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend: {0}")]
    Backend(#[from] sled::Error),
    #[error("record codec: {0}")]
    Codec(#[from] bincode::Error),
    #[error("corrupt chain data: {0}")]
    Corrupt(String),
}

/// Flat byte-keyed storage scope
///
/// Writes made through one handle either fully apply or are discarded by
/// the caller on error; the header store itself never rolls back.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;
    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemKvStore {
    map: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl KvStore for MemKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.map.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.map.insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.map.remove(key);
        Ok(())
    }
}

/// Sled-backed store
#[derive(Debug, Clone)]
pub struct SledKvStore {
    db: Db,
    tree: Tree,
}

impl SledKvStore {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let tree = db.open_tree("headers")?;
        Ok(Self { db, tree })
    }
}

impl KvStore for SledKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tree.get(key)?.map(|v| v.to_vec()))
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.tree.insert(key, value)?;
        self.db.flush()?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.tree.remove(key)?;
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_store_get_put() {
        let mut kv = MemKvStore::new();
        assert!(kv.get(b"k").unwrap().is_none());
        kv.put(b"k", vec![1, 2, 3]).unwrap();
        assert_eq!(kv.get(b"k").unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_mem_store_overwrite() {
        let mut kv = MemKvStore::new();
        kv.put(b"k", vec![1]).unwrap();
        kv.put(b"k", vec![2]).unwrap();
        assert_eq!(kv.get(b"k").unwrap(), Some(vec![2]));
        assert_eq!(kv.len(), 1);
    }

    #[test]
    fn test_mem_store_delete() {
        let mut kv = MemKvStore::new();
        kv.put(b"k", vec![1]).unwrap();
        kv.delete(b"k").unwrap();
        assert!(kv.get(b"k").unwrap().is_none());
        // Deleting an absent key is a no-op
        kv.delete(b"gone").unwrap();
    }
}
