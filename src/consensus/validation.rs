//! Contextual header validation
//!
//! Pure functions checking a candidate header against its parent and branch
//! history: required difficulty bits, proof-of-work, and median-time-past.
//! Ancestry is supplied through a lookup closure so the rules stay agnostic
//! of the storage backend.

use super::difficulty::{calculate_next_bits, compact_to_target, is_retarget_height, meets_target};
use super::network::NetworkParams;
use crate::codec::{BlockHeader, Hash};
use crate::store::{HeaderRecord, StoreError};
use crate::sync::SyncError;

/// Number of ancestors sampled for the median-time-past rule
const MEDIAN_TIME_SPAN: usize = 11;

/// Compute the compact bits a candidate header at `candidate_height` must
/// declare, given its parent record
///
/// On a retarget boundary the period's first header is found by walking the
/// parent's own branch backwards (the parent may sit on a fork, so the
/// canonical height index cannot be used). If the walk crosses the trust
/// anchor before completing the period, the parent's bits are inherited.
pub fn required_bits<L>(
    params: &NetworkParams,
    candidate_height: u32,
    parent: &HeaderRecord,
    mut ancestor: L,
) -> Result<u32, SyncError>
where
    L: FnMut(&Hash) -> Result<Option<HeaderRecord>, StoreError>,
{
    if params.no_retargeting || !is_retarget_height(candidate_height, params) {
        return Ok(parent.header.bits);
    }

    let first_height = candidate_height - params.retarget_interval();
    let mut cursor = parent.clone();
    while cursor.height > first_height {
        match ancestor(&cursor.header.prev_hash)? {
            Some(record) => cursor = record,
            // Trust anchor sits inside the period
            None => return Ok(parent.header.bits),
        }
    }

    Ok(calculate_next_bits(
        parent.header.bits,
        cursor.header.timestamp,
        parent.header.timestamp,
        params,
    ))
}

/// Verify the declared bits match the required ones and the header hash
/// meets the target they encode
pub fn check_proof_of_work(header: &BlockHeader, required: u32) -> Result<(), SyncError> {
    let hash = header.hash();
    if header.bits != required {
        return Err(SyncError::InvalidProofOfWork(hash));
    }
    let target = compact_to_target(header.bits);
    if !meets_target(&hash, &target) {
        return Err(SyncError::InvalidProofOfWork(hash));
    }
    Ok(())
}

/// Median timestamp of the parent and its (up to) ten predecessors
pub fn median_time_past<L>(parent: &HeaderRecord, mut ancestor: L) -> Result<u32, SyncError>
where
    L: FnMut(&Hash) -> Result<Option<HeaderRecord>, StoreError>,
{
    let mut timestamps = Vec::with_capacity(MEDIAN_TIME_SPAN);
    let mut cursor = parent.clone();
    loop {
        timestamps.push(cursor.header.timestamp);
        if timestamps.len() == MEDIAN_TIME_SPAN {
            break;
        }
        match ancestor(&cursor.header.prev_hash)? {
            Some(record) => cursor = record,
            None => break,
        }
    }
    timestamps.sort_unstable();
    Ok(timestamps[timestamps.len() / 2])
}

/// A header's timestamp must advance past the median time of its ancestry
pub fn check_timestamp(header: &BlockHeader, median_time_past: u32) -> Result<(), SyncError> {
    if header.timestamp <= median_time_past {
        return Err(SyncError::InvalidTimestamp(header.hash()));
    }
    Ok(())
}
