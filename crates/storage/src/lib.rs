//! Storage layer for the roster
//!
//! This crate implements the storage backends and the safe codec over them:
//! - MemoryStore: BTreeMap-based string store with RwLock and a byte quota
//! - FileStore: one JSON file per key in a data directory
//! - SafeCodec: JSON load/store that never panics and reports write failures
//! - LogNotifier: routes user-visible notices into `tracing`
//! - testing: fault-injecting store and recording notifier

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod file;
pub mod memory;
pub mod notify;
pub mod testing;

pub use codec::{SafeCodec, SAVE_FAILED_MESSAGE};
pub use file::FileStore;
pub use memory::{MemoryStore, DEFAULT_QUOTA_BYTES};
pub use notify::LogNotifier;
