//! Student records and the plans attached to them

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;
use crate::types::RecordId;

/// A trainee on the trainer's roster
///
/// Everything except `name` may be missing in stored data. Unknown fields are
/// kept in `extra` so a load-modify-save cycle does not drop them. Numbers
/// stored as text by older clients are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Record id
    #[serde(default)]
    pub id: RecordId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Contact phone number
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    /// Age in years
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<u32>,
    /// Free-form gender label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Height in centimetres
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight_kg: Option<f64>,
    /// Training goal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    /// Trainer's notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation time as stored by the client (ISO-8601 text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Training program, one entry per session day
    #[serde(default)]
    pub program: Vec<ProgramDay>,
    /// Diet plan
    #[serde(default)]
    pub diet: Vec<MealPlanEntry>,
    /// Supplement plan
    #[serde(default)]
    pub supplements: Vec<SupplementPlanEntry>,
    /// Fields this version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Student {
    /// Create an unsaved student with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Every exercise id referenced by the program
    pub fn exercise_ids(&self) -> Vec<RecordId> {
        self.program
            .iter()
            .flat_map(|day| day.exercises.iter().map(|e| e.exercise_id))
            .collect()
    }
}

/// One session day of a training program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDay {
    /// Day number within the program (1-based)
    #[serde(default, deserialize_with = "lenient::number")]
    pub day: u32,
    /// Exercises for the day, in order
    #[serde(default)]
    pub exercises: Vec<ProgramExercise>,
}

/// A prescribed exercise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramExercise {
    /// Id in the `exercises` collection; unassigned when the link was lost
    #[serde(default)]
    pub exercise_id: RecordId,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub sets: Option<u32>,
    /// Repetitions, free text ("8-12", "to failure")
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub reps: Option<String>,
    /// Rest between sets, free text
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub rest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A meal assigned to a student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanEntry {
    /// Id in the `meals` collection
    #[serde(default)]
    pub meal_id: RecordId,
    /// Time of day, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Portion, free text
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A supplement assigned to a student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementPlanEntry {
    /// Id in the `supplements` collection
    #[serde(default)]
    pub supplement_id: RecordId,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

crate::impl_record!(Student);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_minimal_legacy_shape() {
        let student: Student = serde_json::from_value(json!({"id": 4, "name": "Sara"})).unwrap();
        assert_eq!(student.id, RecordId::new(4));
        assert_eq!(student.name, "Sara");
        assert!(student.program.is_empty());
        assert!(student.phone.is_none());
    }

    #[test]
    fn test_student_camel_case_fields() {
        let student: Student = serde_json::from_value(json!({
            "id": 1,
            "name": "Ali",
            "heightCm": 181.5,
            "program": [{"day": 1, "exercises": [{"exerciseId": 3, "sets": 4, "reps": "8-10"}]}],
            "diet": [{"mealId": 2, "time": "breakfast"}]
        }))
        .unwrap();
        assert_eq!(student.height_cm, Some(181.5));
        assert_eq!(student.exercise_ids(), vec![RecordId::new(3)]);
        assert_eq!(student.diet[0].meal_id, RecordId::new(2));
    }

    #[test]
    fn test_student_preserves_unknown_fields() {
        let raw = json!({"id": 2, "name": "Reza", "membership": {"plan": "gold"}});
        let student: Student = serde_json::from_value(raw).unwrap();
        assert_eq!(student.extra.get("membership"), Some(&json!({"plan": "gold"})));

        let back = serde_json::to_value(&student).unwrap();
        assert_eq!(back["membership"], json!({"plan": "gold"}));
    }

    #[test]
    fn test_student_tolerates_legacy_value_types() {
        let student: Student = serde_json::from_value(json!({
            "id": "7",
            "name": "Ali",
            "age": "25",
            "phone": 9121234567u64,
            "weightKg": "",
            "program": [{"day": "1", "exercises": [{"sets": "3", "reps": 10}]}],
            "diet": [{"time": "lunch"}],
            "supplements": [{"supplementId": "4", "dosage": 5}]
        }))
        .unwrap();
        assert_eq!(student.id, RecordId::new(7));
        assert_eq!(student.age, Some(25));
        assert_eq!(student.phone.as_deref(), Some("9121234567"));
        assert_eq!(student.weight_kg, None);
        let exercise = &student.program[0].exercises[0];
        assert_eq!(student.program[0].day, 1);
        assert_eq!(exercise.exercise_id, RecordId::UNASSIGNED);
        assert_eq!(exercise.sets, Some(3));
        assert_eq!(exercise.reps.as_deref(), Some("10"));
        assert_eq!(student.diet[0].meal_id, RecordId::UNASSIGNED);
        assert_eq!(student.supplements[0].supplement_id, RecordId::new(4));
        assert_eq!(student.supplements[0].dosage.as_deref(), Some("5"));
    }

    #[test]
    fn test_student_rejects_values_it_cannot_interpret() {
        assert!(serde_json::from_value::<Student>(json!({"name": "Ali", "age": "old"})).is_err());
        assert!(serde_json::from_value::<Student>(json!({"name": {"first": "Ali"}})).is_err());
    }

    #[test]
    fn test_student_skips_absent_optionals() {
        let value = serde_json::to_value(Student::new("Ali")).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("phone"));
        assert_eq!(obj["id"], json!(0));
    }
}
