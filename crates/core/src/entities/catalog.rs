//! Catalogue entities: exercises, their types and categories, meals, supplements

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;
use crate::types::RecordId;

/// An exercise in the trainer's catalogue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    /// Category name (e.g. "chest")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Type name (e.g. "strength")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub exercise_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A kind of exercise (strength, cardio, mobility, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseType {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A muscle-group style grouping of exercises
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseCategory {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    /// Exercise type this category belongs to, when the client sets one
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub exercise_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A meal in the diet catalogue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A supplement in the catalogue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplement {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Default dosage, free text
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub dosage: Option<String>,
    /// Default timing, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

macro_rules! named_constructor {
    ($($ty:ident),+) => {
        $(
            impl $ty {
                /// Create an unsaved entry with just a name
                pub fn new(name: impl Into<String>) -> Self {
                    Self {
                        name: name.into(),
                        ..Self::default()
                    }
                }
            }
        )+
    };
}

named_constructor!(Exercise, ExerciseType, ExerciseCategory, Meal, Supplement);

crate::impl_record!(Exercise, ExerciseType, ExerciseCategory, Meal, Supplement);
