//! RosterDB - local persistence for a gym trainer's roster
//!
//! Students (with their training programs, diets and supplement plans) and
//! the exercise, meal and supplement catalogs are kept as JSON collections in
//! a data directory, or in memory for tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use rosterdb::prelude::*;
//!
//! let roster = Roster::open("./gym-data")?;
//!
//! let ali = roster.students.save(Student::new("Ali"))?;
//! assert_eq!(ali.id, RecordId::new(1));
//!
//! // Re-read whenever anything changes
//! let students = roster.watch(&roster.students);
//! roster.students.save(Student::new("Sara"))?;
//! assert_eq!(students.items().len(), 2);
//!
//! roster.export_to_file("backup.json".as_ref())?;
//! ```
//!
//! # Architecture
//!
//! - `roster-core`: ids, entities, error type and the storage/notifier/bus traits
//! - `roster-storage`: memory and file backends, safe JSON codec
//! - `roster-primitives`: collections, change bus, feature stores, backups
//!
//! This crate wires them into [`Roster`] and reads `roster.toml`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod database;
pub mod prelude;

pub use config::{Durability, RosterConfig, CONFIG_FILE_NAME};
pub use database::{Roster, RosterBuilder};

pub use roster_core::{
    keys, DynamicRecord, Error, EventBus, Exercise, ExerciseCategory, ExerciseType, Listener,
    Meal, MealPlanEntry, Notice, NoticeKind, Notifier, ProgramDay, ProgramExercise, Record,
    RecordId, Result, StoragePort, Student, SubscriptionId, Supplement, SupplementPlanEntry,
};
pub use roster_primitives::{
    next_id, BackupDocument, BackupManager, ChangeBus, Collection, FeatureStore, RestoreReport,
    Subscription, RESTORE_FAILED_MESSAGE, RESTORE_OK_MESSAGE,
};
pub use roster_storage::{FileStore, LogNotifier, MemoryStore, SafeCodec, SAVE_FAILED_MESSAGE};
