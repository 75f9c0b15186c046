//! Feature stores and change subscriptions

use rosterdb::{keys, BackupDocument, DynamicRecord, Exercise, ExerciseType, RecordId, Roster};

use crate::test_utils::{change_counter, count};

#[test]
fn test_view_follows_saves_through_collection() {
    let roster = Roster::ephemeral();
    let view = roster.watch(&roster.exercises);

    roster.exercises.save(Exercise::new("Squat")).unwrap();
    roster.exercises.save(Exercise::new("Lunge")).unwrap();

    let names: Vec<String> = view.items().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["Squat", "Lunge"]);
}

#[test]
fn test_views_refresh_on_unrelated_collection_changes() {
    let roster = Roster::ephemeral();
    let types = roster.watch(&roster.exercise_types);
    roster.exercise_types.save(ExerciseType::new("Strength")).unwrap();

    // another collection changing still refreshes every view
    roster.meals.clear().unwrap();
    assert_eq!(types.items().len(), 1);
}

#[test]
fn test_view_refreshes_after_restore() {
    let roster = Roster::ephemeral();
    let view = roster.watch(&roster.exercises);
    let doc =
        BackupDocument::from_json_str(r#"{"exercises": [{"id": 9, "name": "Pull-up"}]}"#).unwrap();

    roster.restore_backup(&doc).unwrap();
    assert_eq!(view.get(RecordId::new(9)).unwrap().name, "Pull-up");
}

#[test]
fn test_view_handlers() {
    let roster = Roster::ephemeral();
    let view = roster.watch(&roster.exercises);

    let squat = view.handle_save(Exercise::new("Squat")).unwrap();
    assert_eq!(view.items().len(), 1);
    assert!(view.handle_delete(squat.id).unwrap());
    assert!(!view.handle_delete(squat.id).unwrap());
    assert!(view.items().is_empty());
}

#[test]
fn test_dynamic_collection_shares_bus() {
    let roster = Roster::ephemeral();
    let (changes, id) = change_counter(&roster);
    let notes = roster.collection::<DynamicRecord>("coachNotes");

    notes
        .save(DynamicRecord::default().with("text", "deload next week"))
        .unwrap();
    assert_eq!(count(&changes), 1);

    assert!(roster.unsubscribe(id));
    notes.clear().unwrap();
    assert_eq!(count(&changes), 1);

    // not part of the known key set, so backups leave it out
    assert!(roster.export_backup().get("coachNotes").is_none());
    assert!(roster
        .export_backup()
        .get(keys::STUDENTS)
        .is_some_and(|v| v.is_none()));
}
