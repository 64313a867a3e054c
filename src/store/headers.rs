//! Chain-partitioned header repository
//!
//! Two indexes per chain: hash -> record (every header ever accepted,
//! canonical or fork, never deleted) and height -> hash (the canonical
//! branch only, rewritten and truncated during reorganizations). The best
//! pointer and
//! the genesis marker round out a chain's state.

use serde::{Deserialize, Serialize};
use super::keys;
use super::kv::{KvStore, StoreError};
use crate::codec::{BlockHeader, Hash};
use crate::consensus::NetworkParams;

/// Persisted state for one accepted foreign-chain header
///
/// Immutable once written: forks are retained, only the height index moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderRecord {
    pub header: BlockHeader,
    /// Foreign-chain height, parent height + 1 (trusted as given at genesis)
    pub height: u32,
    /// Running PoW total along this branch
    pub cumulative_work: u128,
    /// Original wire bytes, kept for re-serialization and forwarding
    pub raw: Vec<u8>,
}

impl HeaderRecord {
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }
}

/// Pointer to the canonical tip of one chain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BestPointer {
    pub hash: Hash,
    pub height: u32,
    pub cumulative_work: u128,
}

/// Header repository over a key-value scope
#[derive(Debug)]
pub struct HeaderStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> HeaderStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Write a record into the all-headers index
    pub fn put_header(&mut self, chain_id: u64, record: &HeaderRecord) -> Result<(), StoreError> {
        let value = bincode::serialize(record)?;
        self.kv.put(&keys::header_key(chain_id, &record.hash()), value)
    }

    pub fn header_by_hash(
        &self,
        chain_id: u64,
        hash: &Hash,
    ) -> Result<Option<HeaderRecord>, StoreError> {
        match self.kv.get(&keys::header_key(chain_id, hash))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn has_header(&self, chain_id: u64, hash: &Hash) -> Result<bool, StoreError> {
        Ok(self.kv.get(&keys::header_key(chain_id, hash))?.is_some())
    }

    /// Canonical hash at a height, if the height index covers it
    pub fn hash_by_height(&self, chain_id: u64, height: u32) -> Result<Option<Hash>, StoreError> {
        match self.kv.get(&keys::height_key(chain_id, height))? {
            Some(bytes) => {
                if bytes.len() != 32 {
                    return Err(StoreError::Corrupt(format!(
                        "height index entry for chain {chain_id} height {height} has {} bytes",
                        bytes.len()
                    )));
                }
                let mut arr = [0u8; 32];
                arr.copy_from_slice(&bytes);
                Ok(Some(Hash(arr)))
            }
            None => Ok(None),
        }
    }

    /// Canonical record at a height
    pub fn header_by_height(
        &self,
        chain_id: u64,
        height: u32,
    ) -> Result<Option<HeaderRecord>, StoreError> {
        match self.hash_by_height(chain_id, height)? {
            Some(hash) => self.header_by_hash(chain_id, &hash),
            None => Ok(None),
        }
    }

    pub fn set_height_entry(
        &mut self,
        chain_id: u64,
        height: u32,
        hash: &Hash,
    ) -> Result<(), StoreError> {
        self.kv.put(&keys::height_key(chain_id, height), hash.0.to_vec())
    }

    /// Drop a canonical entry; used when a reorganization shortens the chain
    pub fn clear_height_entry(&mut self, chain_id: u64, height: u32) -> Result<(), StoreError> {
        self.kv.delete(&keys::height_key(chain_id, height))
    }

    /// Bulk-overwrite a contiguous height range; used only during
    /// reorganization
    pub fn rewrite_height_index(
        &mut self,
        chain_id: u64,
        from_height: u32,
        hashes: &[Hash],
    ) -> Result<(), StoreError> {
        for (i, hash) in hashes.iter().enumerate() {
            self.set_height_entry(chain_id, from_height + i as u32, hash)?;
        }
        Ok(())
    }

    pub fn best_pointer(&self, chain_id: u64) -> Result<Option<BestPointer>, StoreError> {
        match self.kv.get(&keys::best_key(chain_id))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn set_best_pointer(
        &mut self,
        chain_id: u64,
        best: &BestPointer,
    ) -> Result<(), StoreError> {
        let value = bincode::serialize(best)?;
        self.kv.put(&keys::best_key(chain_id), value)
    }

    pub fn genesis_hash(&self, chain_id: u64) -> Result<Option<Hash>, StoreError> {
        match self.kv.get(&keys::genesis_key(chain_id))? {
            Some(bytes) => {
                if bytes.len() != 32 {
                    return Err(StoreError::Corrupt(format!(
                        "genesis marker for chain {chain_id} has {} bytes",
                        bytes.len()
                    )));
                }
                let mut arr = [0u8; 32];
                arr.copy_from_slice(&bytes);
                Ok(Some(Hash(arr)))
            }
            None => Ok(None),
        }
    }

    pub fn set_genesis_hash(&mut self, chain_id: u64, hash: &Hash) -> Result<(), StoreError> {
        self.kv.put(&keys::genesis_key(chain_id), hash.0.to_vec())
    }

    pub fn network_params(&self, chain_id: u64) -> Result<Option<NetworkParams>, StoreError> {
        match self.kv.get(&keys::params_key(chain_id))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn set_network_params(
        &mut self,
        chain_id: u64,
        params: &NetworkParams,
    ) -> Result<(), StoreError> {
        let value = bincode::serialize(params)?;
        self.kv.put(&keys::params_key(chain_id), value)
    }
}
