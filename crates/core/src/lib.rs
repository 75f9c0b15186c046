//! Core types and traits for the roster persistence layer
//!
//! This crate defines the foundational types used throughout the system:
//! - RecordId: Integer identifier of a record within a collection
//! - Record: Trait every stored item implements
//! - Entities: Student, Exercise, ExerciseType, ExerciseCategory, Meal, Supplement
//! - Error: Error type hierarchy
//! - Traits: StoragePort, Notifier, EventBus

#![warn(clippy::all)]

pub mod entities;
pub mod error;
pub mod lenient;
pub mod record;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use entities::{
    Exercise, ExerciseCategory, ExerciseType, Meal, MealPlanEntry, ProgramDay, ProgramExercise,
    Student, Supplement, SupplementPlanEntry,
};
pub use error::{Error, Result};
pub use record::{DynamicRecord, Record};
pub use traits::{EventBus, Listener, Notice, NoticeKind, Notifier, StoragePort};
pub use types::{keys, RecordId, SubscriptionId};
