//! Primitives layer for the roster
//!
//! Provides the persistence primitives as stateless facades over a
//! [`SafeCodec`](roster_storage::SafeCodec):
//! - **Collection**: typed list of records under one storage key
//! - **next_id**: identifier allocation (`max + 1`)
//! - **ChangeBus**: process-wide "storage changed" broadcast
//! - **FeatureStore**: in-memory view that refreshes on every change signal
//! - **BackupManager**: export/restore of whole collections
//!
//! ## Design Principle: Stateless Facades
//!
//! Collections and backups hold only shared handles (codec, bus). All state
//! lives in storage, so any number of handles on the same key are safe and
//! see each other's writes on their next read.
//!
//! ## Change Notification
//!
//! Mutations emit one payload-free signal after a successful write:
//!
//! ```rust,ignore
//! let students: Collection<Student> = Collection::new(keys::STUDENTS, codec, bus.clone());
//! let _sub = Subscription::new(bus, Arc::new(|| println!("changed")));
//! students.save(Student::new("Ali"))?; // prints "changed"
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod allocator;
pub mod backup;
pub mod collection;
pub mod document;
pub mod events;
pub mod feature;

pub use allocator::next_id;
pub use backup::{
    BackupDocument, BackupManager, RestoreReport, RESTORE_FAILED_MESSAGE, RESTORE_OK_MESSAGE,
};
pub use collection::Collection;
pub use document::{
    read_document, read_records, try_read_records, write_records, Decoded, Envelope,
    SCHEMA_VERSION,
};
pub use events::{ChangeBus, Subscription};
pub use feature::FeatureStore;
