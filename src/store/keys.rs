//! Key layout for the chain-partitioned header store
//!
//! Every key starts with a one-byte purpose tag followed by the chain id,
//! so state for different foreign chains can never collide.

use crate::codec::Hash;

const TAG_HEADER: u8 = b'h';
const TAG_HEIGHT: u8 = b'i';
const TAG_BEST: u8 = b'b';
const TAG_GENESIS: u8 = b'g';
const TAG_PARAMS: u8 = b'p';

fn base(tag: u8, chain_id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + 8 + 32);
    key.push(tag);
    key.extend_from_slice(&chain_id.to_le_bytes());
    key
}

/// All-headers index: hash -> record
pub(super) fn header_key(chain_id: u64, hash: &Hash) -> Vec<u8> {
    let mut key = base(TAG_HEADER, chain_id);
    key.extend_from_slice(&hash.0);
    key
}

/// Canonical height index: height -> hash
pub(super) fn height_key(chain_id: u64, height: u32) -> Vec<u8> {
    let mut key = base(TAG_HEIGHT, chain_id);
    key.extend_from_slice(&height.to_be_bytes());
    key
}

/// Best-tip pointer
pub(super) fn best_key(chain_id: u64) -> Vec<u8> {
    base(TAG_BEST, chain_id)
}

/// Genesis (trust anchor) marker
pub(super) fn genesis_key(chain_id: u64) -> Vec<u8> {
    base(TAG_GENESIS, chain_id)
}

/// Network parameter set chosen at genesis
pub(super) fn params_key(chain_id: u64) -> Vec<u8> {
    base(TAG_PARAMS, chain_id)
}
