//! Fork resolution
//!
//! Decides whether a newly accepted header record becomes the canonical
//! tip. Only strictly greater cumulative work triggers a reorganization;
//! ties keep the first-seen branch. A direct successor of the current best
//! runs through the same path, degenerating to a one-entry index append.

use super::handler::SyncError;
use crate::store::{BestPointer, HeaderRecord, HeaderStore, KvStore, StoreError};

/// Apply the fork-choice rule for a record already present in the
/// all-headers index. Returns true when the best pointer moved.
pub(super) fn apply_fork_choice<S: KvStore>(
    store: &mut HeaderStore<S>,
    chain_id: u64,
    record: &HeaderRecord,
    best: &BestPointer,
) -> Result<bool, SyncError> {
    if record.cumulative_work <= best.cumulative_work {
        // Passive fork-branch member: reachable by hash, usable as a parent
        return Ok(false);
    }

    let best_record = store
        .header_by_hash(chain_id, &best.hash)?
        .ok_or_else(|| StoreError::Corrupt(format!("best pointer {} has no record", best.hash)))?;
    let ancestor = common_ancestor(store, chain_id, record, &best_record)?;

    // Collect the new branch top-down, then point each height at it
    let mut hashes = Vec::with_capacity((record.height - ancestor.height) as usize);
    let mut cursor = record.clone();
    while cursor.height > ancestor.height {
        hashes.push(cursor.hash());
        cursor = parent_of(store, chain_id, &cursor)?;
    }
    hashes.reverse();

    store.rewrite_height_index(chain_id, ancestor.height + 1, &hashes)?;
    // A heavier branch can still be shorter than the one it displaces;
    // entries above its tip are no longer canonical
    if best.height > record.height {
        for height in (record.height + 1)..=best.height {
            store.clear_height_entry(chain_id, height)?;
        }
    }
    store.set_best_pointer(
        chain_id,
        &BestPointer {
            hash: record.hash(),
            height: record.height,
            cumulative_work: record.cumulative_work,
        },
    )?;
    Ok(true)
}

/// Walk the deeper branch up to the shallower one's height, then both in
/// lockstep until they meet. Terminates at the shared trust anchor.
fn common_ancestor<S: KvStore>(
    store: &HeaderStore<S>,
    chain_id: u64,
    a: &HeaderRecord,
    b: &HeaderRecord,
) -> Result<HeaderRecord, SyncError> {
    let mut a = a.clone();
    let mut b = b.clone();
    while a.height > b.height {
        a = parent_of(store, chain_id, &a)?;
    }
    while b.height > a.height {
        b = parent_of(store, chain_id, &b)?;
    }
    while a.hash() != b.hash() {
        a = parent_of(store, chain_id, &a)?;
        b = parent_of(store, chain_id, &b)?;
    }
    Ok(a)
}

fn parent_of<S: KvStore>(
    store: &HeaderStore<S>,
    chain_id: u64,
    record: &HeaderRecord,
) -> Result<HeaderRecord, SyncError> {
    store
        .header_by_hash(chain_id, &record.header.prev_hash)?
        .ok_or_else(|| {
            StoreError::Corrupt(format!(
                "stored header {} at height {} has no parent record",
                record.hash(),
                record.height
            ))
            .into()
        })
}
