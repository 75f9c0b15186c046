//! Core types for the roster persistence layer
//!
//! This module defines the foundational types:
//! - RecordId: Integer identifier of a record within one collection
//! - SubscriptionId: Handle returned when subscribing to change notifications
//! - Well-known collection keys

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a record within one collection
///
/// Serialized as a bare JSON number. `RecordId::UNASSIGNED` (0) is what a
/// record carries before its first save; it is also the serde default when a
/// stored record has no `id` field.
///
/// Older clients sometimes stored ids as text (`"12"`) or as `null`, which
/// are accepted on read. Blank text and `null` read as unassigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        crate::lenient::optional_number(deserializer).map(|raw| Self(raw.unwrap_or_default()))
    }
}

impl RecordId {
    /// Id of a record that has not been saved yet
    pub const UNASSIGNED: RecordId = RecordId(0);

    /// First id handed out in an empty collection
    pub const FIRST: RecordId = RecordId(1);

    /// Create a RecordId from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether this id was handed out by an allocator (non-zero)
    pub const fn is_assigned(&self) -> bool {
        self.0 != 0
    }

    /// The id following this one, or `None` past `u64::MAX`
    pub const fn next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for a change-notification subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Create a SubscriptionId from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Storage keys of the collections the roster keeps
pub mod keys {
    /// Students and their programs
    pub const STUDENTS: &str = "students";
    /// Exercise catalogue
    pub const EXERCISES: &str = "exercises";
    /// Exercise types (e.g. strength, cardio)
    pub const EXERCISE_TYPES: &str = "exerciseTypes";
    /// Exercise categories (e.g. chest, legs)
    pub const EXERCISE_CATEGORIES: &str = "exerciseCategories";
    /// Meal catalogue
    pub const MEALS: &str = "meals";
    /// Supplement catalogue
    pub const SUPPLEMENTS: &str = "supplements";

    /// Every well-known key, in backup order
    pub const ALL: [&str; 6] = [
        STUDENTS,
        EXERCISES,
        EXERCISE_TYPES,
        EXERCISE_CATEGORIES,
        MEALS,
        SUPPLEMENTS,
    ];
}
