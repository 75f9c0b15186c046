//! Entity types stored in the roster's collections
//!
//! - Student: a trainee, with training program, diet and supplement plans
//! - Exercise, ExerciseType, ExerciseCategory: the exercise catalogue
//! - Meal: the diet catalogue
//! - Supplement: the supplement catalogue

mod catalog;
mod student;

pub use catalog::{Exercise, ExerciseCategory, ExerciseType, Meal, Supplement};
pub use student::{MealPlanEntry, ProgramDay, ProgramExercise, Student, SupplementPlanEntry};
