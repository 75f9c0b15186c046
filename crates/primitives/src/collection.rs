//! Collection: typed, keyed list of records
//!
//! ## Design
//!
//! A Collection is a stateless facade over one storage key. It holds no
//! records in memory: every read decodes the stored document, and every
//! mutation is a full read-modify-write of the whole list.
//!
//! ## Notification
//!
//! Each mutation that reaches the store emits exactly one change signal on
//! the shared bus, after the write. A failed write emits nothing and returns
//! the error (the user was already told by the codec).
//!
//! ## Undecodable Records
//!
//! Reads skip stored records that do not decode as `T`. `save`, `delete` and
//! `delete_many` rewrite the list from what they read, so they refuse with
//! [`Error::UndecodedRecords`] while such records are present. `save_all` and
//! `clear` replace the list outright and are still allowed.
//!
//! ## Thread Safety
//!
//! Collection is `Send + Sync` and cheap to clone. Two handles on the same
//! key see each other's writes on their next read. Concurrent writers can
//! lose updates; one active writer is assumed.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, warn};

use roster_core::{Error, EventBus, Record, RecordId, Result};
use roster_storage::{SafeCodec, SAVE_FAILED_MESSAGE};

use crate::allocator::next_id;
use crate::document::{read_document, read_records, write_records};

/// Persistent list of records of type `T` stored under one key
///
/// # Example
///
/// ```ignore
/// use roster_core::{keys, Student};
/// use roster_primitives::Collection;
///
/// let students: Collection<Student> = Collection::new(keys::STUDENTS, codec, bus);
/// let saved = students.save(Student::new("Ali"))?;
/// assert_eq!(saved.id.as_u64(), 1);
/// students.delete(saved.id)?;
/// ```
pub struct Collection<T: Record> {
    key: String,
    codec: SafeCodec,
    bus: Arc<dyn EventBus>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            codec: self.codec.clone(),
            bus: Arc::clone(&self.bus),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection").field("key", &self.key).finish()
    }
}

impl<T: Record> Collection<T> {
    /// Create a collection stored at `key`
    pub fn new(key: impl Into<String>, codec: SafeCodec, bus: Arc<dyn EventBus>) -> Self {
        Self {
            key: key.into(),
            codec,
            bus,
            _marker: PhantomData,
        }
    }

    /// Storage key of this collection
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The bus change signals go to
    pub fn bus(&self) -> &Arc<dyn EventBus> {
        &self.bus
    }

    /// The codec records are read and written through
    pub fn codec(&self) -> &SafeCodec {
        &self.codec
    }

    // ========== Reads ==========

    /// Every record, in stored order
    ///
    /// Absent or unreadable content yields an empty list. Records that do not
    /// decode are left out.
    pub fn get_all(&self) -> Vec<T> {
        read_records(&self.codec, &self.key)
    }

    /// First record with `id`
    pub fn get_by_id(&self, id: RecordId) -> Option<T> {
        self.get_all().into_iter().find(|r| r.id() == id)
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.get_all().len()
    }

    /// True when no records are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========== Mutations ==========

    /// Insert or update a record
    ///
    /// A record whose id matches a stored one replaces it in place, keeping
    /// its position. Otherwise the record gets the next free id (whatever id
    /// it carried) and is appended. Returns the record as stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndecodedRecords`] when stored records could not be
    /// read, [`Error::IdsExhausted`] when no id is left for a new record, or
    /// the write error. Nothing is written or emitted in any of these cases.
    pub fn save(&self, mut item: T) -> Result<T> {
        let mut records = self.records_for_rewrite()?;
        let position = if item.id().is_assigned() {
            records.iter().position(|r| r.id() == item.id())
        } else {
            None
        };

        match position {
            Some(index) => {
                debug!(key = %self.key, id = %item.id(), "updating record");
                records[index] = item.clone();
            }
            None => {
                let id = match next_id(&records) {
                    Some(id) => id,
                    None => {
                        warn!(key = %self.key, "no ids left");
                        self.codec.notify_error(SAVE_FAILED_MESSAGE);
                        return Err(Error::IdsExhausted(self.key.clone()));
                    }
                };
                debug!(key = %self.key, id = %id, "inserting record");
                item.set_id(id);
                records.push(item.clone());
            }
        }

        self.commit(&records)?;
        Ok(item)
    }

    /// Replace the whole collection with `items` verbatim
    ///
    /// Ids are not checked or assigned.
    ///
    /// # Errors
    ///
    /// Returns the write error; nothing is emitted.
    pub fn save_all(&self, items: &[T]) -> Result<()> {
        debug!(key = %self.key, count = items.len(), "replacing collection");
        self.commit(items)
    }

    /// Remove every record with `id`
    ///
    /// Returns `false` without writing or emitting when no record matched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndecodedRecords`] or the write error; nothing is
    /// emitted.
    pub fn delete(&self, id: RecordId) -> Result<bool> {
        let mut records = self.records_for_rewrite()?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            debug!(key = %self.key, id = %id, "delete matched nothing");
            return Ok(false);
        }
        debug!(key = %self.key, id = %id, "deleting record");
        self.commit(&records)?;
        Ok(true)
    }

    /// Remove every record whose id is in `ids`
    ///
    /// Always writes and emits, even when nothing matched. Returns how many
    /// records were removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndecodedRecords`] or the write error; nothing is
    /// emitted.
    pub fn delete_many(&self, ids: &[RecordId]) -> Result<usize> {
        let mut records = self.records_for_rewrite()?;
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id()));
        let removed = before - records.len();
        debug!(key = %self.key, requested = ids.len(), removed, "deleting records");
        self.commit(&records)?;
        Ok(removed)
    }

    /// Remove every record
    ///
    /// Leaves an empty list in storage rather than removing the key.
    ///
    /// # Errors
    ///
    /// Returns the write error; nothing is emitted.
    pub fn clear(&self) -> Result<()> {
        debug!(key = %self.key, "clearing collection");
        self.commit(&[])
    }

    /// Stored records, only if every one of them decoded
    fn records_for_rewrite(&self) -> Result<Vec<T>> {
        let decoded = match read_document(&self.codec, &self.key) {
            Some(decoded) => decoded,
            None => return Ok(Vec::new()),
        };
        if decoded.is_complete() {
            return Ok(decoded.records);
        }
        warn!(
            key = %self.key,
            skipped = decoded.skipped,
            "refusing to rewrite collection with undecodable records"
        );
        self.codec.notify_error(SAVE_FAILED_MESSAGE);
        Err(Error::UndecodedRecords {
            key: self.key.clone(),
            skipped: decoded.skipped,
        })
    }

    fn commit(&self, records: &[T]) -> Result<()> {
        write_records(&self.codec, &self.key, records)?;
        self.bus.emit();
        Ok(())
    }
}
