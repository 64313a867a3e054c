//! Header-sync orchestrator
//!
//! Entry points invoked once per submitted relay transaction:
//! `sync_genesis_header` anchors a chain, `sync_block_header` ingests a
//! relayer batch. Each call runs inside the caller's transactional storage
//! scope; a failed call leaves the decision to discard partial writes to
//! the enclosing ledger.

use std::collections::HashMap;
use thiserror::Error;

use super::fork;
use crate::codec::{
    BlockHeader, CodecError, Hash, Source, SyncBlockHeaderParam, SyncGenesisHeaderParam,
    HEADER_SIZE,
};
use crate::consensus::{
    check_proof_of_work, check_timestamp, median_time_past, required_bits, work_for_bits,
    NetworkParams,
};
use crate::store::{BestPointer, HeaderRecord, HeaderStore, KvStore, StoreError};

/// Header-sync errors, mapped by the calling transaction layer to
/// transaction-level error codes
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("malformed header: {0}")]
    Malformed(#[from] CodecError),
    #[error("chain {0} is not initialized")]
    ChainNotInitialized(u64),
    #[error("genesis conflict for chain {chain_id}: existing {existing}, submitted {submitted}")]
    GenesisConflict {
        chain_id: u64,
        existing: Hash,
        submitted: Hash,
    },
    #[error("orphan header {hash}: unknown parent {parent}")]
    OrphanHeader { hash: Hash, parent: Hash },
    #[error("invalid proof of work for header {0}")]
    InvalidProofOfWork(Hash),
    #[error("header {0} exceeds the maximum chain height")]
    HeightOverflow(Hash),
    #[error("header {0} timestamp below median time past")]
    InvalidTimestamp(Hash),
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Foreign-chain header synchronization engine
#[derive(Debug)]
pub struct HeaderSyncer<S: KvStore> {
    store: HeaderStore<S>,
}

impl<S: KvStore> HeaderSyncer<S> {
    pub fn new(kv: S) -> Self {
        Self {
            store: HeaderStore::new(kv),
        }
    }

    /// Read access to the underlying header store
    pub fn store(&self) -> &HeaderStore<S> {
        &self.store
    }

    /// Anchor a chain at a trusted genesis header
    ///
    /// Exactly once per chain id: re-submitting the identical genesis is a
    /// no-op, a different one is a conflict (re-anchoring a trust root is a
    /// governance action outside this module). The genesis is trusted as
    /// given; its work starts the branch total without ancestor accumulation.
    pub fn sync_genesis_header(
        &mut self,
        param: &SyncGenesisHeaderParam,
        net: &NetworkParams,
    ) -> Result<(), SyncError> {
        let chain_id = param.chain_id;
        let (header, trusted_height, raw) = decode_genesis_blob(&param.genesis_header)?;
        let hash = header.hash();

        if let Some(existing) = self.store.genesis_hash(chain_id)? {
            if existing == hash {
                return Ok(());
            }
            return Err(SyncError::GenesisConflict {
                chain_id,
                existing,
                submitted: hash,
            });
        }

        let record = HeaderRecord {
            cumulative_work: work_for_bits(header.bits),
            header,
            height: trusted_height,
            raw,
        };

        self.store.put_header(chain_id, &record)?;
        self.store.set_height_entry(chain_id, trusted_height, &hash)?;
        self.store.set_best_pointer(
            chain_id,
            &BestPointer {
                hash,
                height: trusted_height,
                cumulative_work: record.cumulative_work,
            },
        )?;
        self.store.set_genesis_hash(chain_id, &hash)?;
        self.store.set_network_params(chain_id, net)?;
        Ok(())
    }

    /// Ingest a relayer batch of headers, strictly in submission order
    ///
    /// Known hashes are skipped silently. The first failure stops the call;
    /// headers already applied in the same call remain persisted and the
    /// enclosing transaction decides whether to discard them.
    pub fn sync_block_header(&mut self, param: &SyncBlockHeaderParam) -> Result<(), SyncError> {
        let chain_id = param.chain_id;
        if self.store.genesis_hash(chain_id)?.is_none() {
            return Err(SyncError::ChainNotInitialized(chain_id));
        }
        let net = self.store.network_params(chain_id)?.ok_or_else(|| {
            StoreError::Corrupt(format!("chain {chain_id} has no stored network params"))
        })?;

        for raw in &param.headers {
            self.sync_one_header(chain_id, &net, raw)?;
        }
        Ok(())
    }

    fn sync_one_header(
        &mut self,
        chain_id: u64,
        net: &NetworkParams,
        raw: &[u8],
    ) -> Result<(), SyncError> {
        let header = BlockHeader::decode(raw)?;
        let hash = header.hash();

        // Idempotent re-submission
        if self.store.has_header(chain_id, &hash)? {
            return Ok(());
        }

        let parent = self
            .store
            .header_by_hash(chain_id, &header.prev_hash)?
            .ok_or(SyncError::OrphanHeader {
                hash,
                parent: header.prev_hash,
            })?;
        let height = parent
            .height
            .checked_add(1)
            .ok_or(SyncError::HeightOverflow(hash))?;

        let required = required_bits(net, height, &parent, |h| {
            self.store.header_by_hash(chain_id, h)
        })?;
        check_proof_of_work(&header, required)?;
        let mtp = median_time_past(&parent, |h| self.store.header_by_hash(chain_id, h))?;
        check_timestamp(&header, mtp)?;

        let record = HeaderRecord {
            cumulative_work: parent.cumulative_work + work_for_bits(header.bits),
            header,
            height,
            raw: raw.to_vec(),
        };
        self.store.put_header(chain_id, &record)?;

        let best = self
            .store
            .best_pointer(chain_id)?
            .ok_or(SyncError::ChainNotInitialized(chain_id))?;
        fork::apply_fork_choice(&mut self.store, chain_id, &record, &best)?;
        Ok(())
    }

    /// Canonical record at a height
    pub fn header_by_height(&self, chain_id: u64, height: u32) -> Result<HeaderRecord, SyncError> {
        self.store
            .header_by_height(chain_id, height)?
            .ok_or(SyncError::NotFound)
    }

    /// Any stored record by hash, canonical or fork
    pub fn header_by_hash(&self, chain_id: u64, hash: &Hash) -> Result<HeaderRecord, SyncError> {
        self.store
            .header_by_hash(chain_id, hash)?
            .ok_or(SyncError::NotFound)
    }

    /// Record at the canonical tip
    pub fn best_header(&self, chain_id: u64) -> Result<HeaderRecord, SyncError> {
        let best = self.store.best_pointer(chain_id)?.ok_or(SyncError::NotFound)?;
        self.store
            .header_by_hash(chain_id, &best.hash)?
            .ok_or(SyncError::NotFound)
    }
}

/// Split a genesis blob into header, trusted height, and the raw wire bytes
fn decode_genesis_blob(blob: &[u8]) -> Result<(BlockHeader, u32, Vec<u8>), CodecError> {
    if blob.len() != HEADER_SIZE + 4 {
        return Err(CodecError::BadLength {
            expected: HEADER_SIZE + 4,
            actual: blob.len(),
        });
    }
    let mut src = Source::new(blob);
    let raw = src.read_bytes(HEADER_SIZE)?.to_vec();
    let header = BlockHeader::decode(&raw)?;
    let trusted_height = src.read_u32_be()?;
    Ok((header, trusted_height, raw))
}

/// Invocation methods bound to the native-service contract
///
/// The external contract stays string-keyed; internally dispatch runs on
/// the typed variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    SyncGenesisHeader,
    SyncBlockHeader,
}

impl Method {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "syncGenesisHeader" => Some(Self::SyncGenesisHeader),
            "syncBlockHeader" => Some(Self::SyncBlockHeader),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SyncGenesisHeader => "syncGenesisHeader",
            Self::SyncBlockHeader => "syncBlockHeader",
        }
    }
}

/// Native-service handler: decodes argument blobs and drives the syncer
#[derive(Debug)]
pub struct HeaderSyncHandler<S: KvStore> {
    syncer: HeaderSyncer<S>,
    chain_params: HashMap<u64, NetworkParams>,
}

impl<S: KvStore> HeaderSyncHandler<S> {
    pub fn new(kv: S) -> Self {
        Self {
            syncer: HeaderSyncer::new(kv),
            chain_params: HashMap::new(),
        }
    }

    /// Choose the rule set a chain will be anchored with. Chains without a
    /// registration fall back to main-network rules.
    pub fn register_chain(&mut self, chain_id: u64, params: NetworkParams) {
        self.chain_params.insert(chain_id, params);
    }

    pub fn syncer(&self) -> &HeaderSyncer<S> {
        &self.syncer
    }

    /// Dispatch one invocation with its binary argument blob
    pub fn invoke(&mut self, method: Method, input: &[u8]) -> Result<(), SyncError> {
        match method {
            Method::SyncGenesisHeader => {
                let param = SyncGenesisHeaderParam::decode(input)?;
                let net = self
                    .chain_params
                    .get(&param.chain_id)
                    .cloned()
                    .unwrap_or_else(NetworkParams::mainnet);
                self.syncer.sync_genesis_header(&param, &net)
            }
            Method::SyncBlockHeader => {
                let param = SyncBlockHeaderParam::decode(input)?;
                self.syncer.sync_block_header(&param)
            }
        }
    }
}
