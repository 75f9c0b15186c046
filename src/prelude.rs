//! Common imports
//!
//! ```ignore
//! use rosterdb::prelude::*;
//! ```

pub use crate::{Roster, RosterBuilder, RosterConfig};
pub use roster_core::{
    keys, Error, Exercise, ExerciseCategory, ExerciseType, Meal, Record, RecordId, Result,
    Student, Supplement,
};
pub use roster_primitives::{Collection, FeatureStore};
