//! Data survives reopening the data directory

use rosterdb::{
    keys, MealPlanEntry, ProgramDay, ProgramExercise, RecordId, Roster, Student,
    SupplementPlanEntry,
};
use rosterdb::{Exercise, Meal, Supplement};

use crate::test_utils::on_disk;

fn trainee(roster: &Roster) -> Student {
    let squat = roster.exercises.save(Exercise::new("Squat")).unwrap();
    let oats = roster.meals.save(Meal::new("Oats")).unwrap();
    let whey = roster.supplements.save(Supplement::new("Whey")).unwrap();

    let mut ali = Student::new("Ali");
    ali.program = vec![ProgramDay {
        day: 1,
        exercises: vec![ProgramExercise {
            exercise_id: squat.id,
            sets: Some(4),
            reps: Some("8-10".into()),
            ..ProgramExercise::default()
        }],
    }];
    ali.diet = vec![MealPlanEntry {
        meal_id: oats.id,
        ..MealPlanEntry::default()
    }];
    ali.supplements = vec![SupplementPlanEntry {
        supplement_id: whey.id,
        ..SupplementPlanEntry::default()
    }];
    ali
}

#[test]
fn test_records_survive_reopen() {
    let (roster, temp) = on_disk();
    let ali = roster.students.save(trainee(&roster)).unwrap();
    drop(roster);

    let reopened = Roster::open(temp.path()).unwrap();
    let loaded = reopened.students.get_by_id(ali.id).unwrap();
    assert_eq!(loaded, ali);
    assert_eq!(loaded.exercise_ids(), vec![RecordId::new(1)]);
}

#[test]
fn test_ids_continue_after_reopen() {
    let (roster, temp) = on_disk();
    roster.students.save(Student::new("Ali")).unwrap();
    roster.students.save(Student::new("Sara")).unwrap();
    drop(roster);

    let reopened = Roster::open(temp.path()).unwrap();
    let reza = reopened.students.save(Student::new("Reza")).unwrap();
    assert_eq!(reza.id, RecordId::new(3));
}

#[test]
fn test_one_file_per_collection() {
    let (roster, temp) = on_disk();
    roster.students.save(Student::new("Ali")).unwrap();
    roster.meals.save(Meal::new("Rice")).unwrap();

    assert!(temp.path().join("students.json").exists());
    assert!(temp.path().join("meals.json").exists());
    assert_eq!(
        roster.stored_keys().unwrap(),
        vec![keys::MEALS.to_string(), keys::STUDENTS.to_string()]
    );
}

#[test]
fn test_corrupt_file_reads_empty_and_recovers() {
    let (roster, temp) = on_disk();
    roster.students.save(Student::new("Ali")).unwrap();
    std::fs::write(temp.path().join("students.json"), "\u{0}\u{1} garbage").unwrap();

    assert!(roster.students.get_all().is_empty());
    roster.students.save(Student::new("Sara")).unwrap();
    assert_eq!(roster.students.get_all()[0].name, "Sara");
}

#[test]
fn test_legacy_bare_array_file_is_read() {
    let (roster, temp) = on_disk();
    std::fs::write(
        temp.path().join("exercises.json"),
        r#"[{"id": 2, "name": "Bench", "category": "chest"}]"#,
    )
    .unwrap();

    let bench = roster.exercises.get_by_id(RecordId::new(2)).unwrap();
    assert_eq!(bench.category.as_deref(), Some("chest"));

    // rewritten as an envelope on the next save
    roster.exercises.save(Exercise::new("Row")).unwrap();
    let raw = std::fs::read_to_string(temp.path().join("exercises.json")).unwrap();
    assert!(raw.contains("\"schemaVersion\":1"));
}

#[test]
fn test_mistyped_legacy_students_survive_a_save() {
    let (roster, temp) = on_disk();
    std::fs::write(
        temp.path().join("students.json"),
        r#"[{"id": 1, "name": "Ali", "age": "25", "program": [{"day": 1, "exercises": [{"sets": "3"}]}]},
            {"id": 2, "name": "Sara", "age": 30}]"#,
    )
    .unwrap();

    let reza = roster.students.save(Student::new("Reza")).unwrap();
    assert_eq!(reza.id, RecordId::new(3));

    let reopened = Roster::open(temp.path()).unwrap();
    let all = reopened.students.get_all();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].age, Some(25));
    assert_eq!(all[0].program[0].exercises[0].sets, Some(3));
    assert_eq!(all[1].name, "Sara");
}

#[test]
fn test_unreadable_student_blocks_save() {
    let (roster, temp) = on_disk();
    let path = temp.path().join("students.json");
    let stored = r#"[{"id": 1, "name": "Ali", "age": "n/a"}, {"id": 2, "name": "Sara"}]"#;
    std::fs::write(&path, stored).unwrap();

    assert!(roster
        .students
        .save(Student::new("Reza"))
        .unwrap_err()
        .is_undecoded_records());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), stored);
}

#[test]
fn test_unknown_fields_survive_update() {
    let (roster, temp) = on_disk();
    std::fs::write(
        temp.path().join("students.json"),
        r#"[{"id": 1, "name": "Ali", "instagram": "@ali"}]"#,
    )
    .unwrap();

    let mut ali = roster.students.get_by_id(RecordId::new(1)).unwrap();
    ali.goal = Some("cut".into());
    roster.students.save(ali).unwrap();

    let raw = std::fs::read_to_string(temp.path().join("students.json")).unwrap();
    assert!(raw.contains("@ali"));
}
