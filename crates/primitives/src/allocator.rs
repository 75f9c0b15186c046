//! Identifier allocator
//!
//! The next id is `max(existing ids) + 1`, or `1` for an empty collection.
//! Two writers allocating from separate snapshots of the same collection can
//! hand out the same id; the layer assumes a single active writer.
//!
//! When the highest stored id is `u64::MAX` there is no next id, and the
//! allocator says so instead of repeating one.

use roster_core::{Record, RecordId};

/// Next free id for a collection currently holding `records`
///
/// `None` when the id space is exhausted.
pub fn next_id<T: Record>(records: &[T]) -> Option<RecordId> {
    match records.iter().map(Record::id).max() {
        Some(max) => max.next(),
        None => Some(RecordId::FIRST),
    }
}
