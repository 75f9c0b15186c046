//! Backup export/restore through the facade

use std::sync::Arc;

use rosterdb::{
    keys, BackupDocument, Error, Meal, NoticeKind, RecordId, Roster, Student, Supplement,
    RESTORE_FAILED_MESSAGE,
};
use roster_storage::testing::{FaultyStore, RecordingNotifier};
use serde_json::json;

use crate::test_utils::{change_counter, count, on_disk};

#[test]
fn test_restore_students_keeps_null_meals() {
    let roster = Roster::ephemeral();
    roster.meals.save(Meal::new("Oats")).unwrap();
    let (changes, _id) = change_counter(&roster);

    let doc = BackupDocument::from_json_str(
        r#"{"students": [{"id": 1, "name": "Ali"}, {"id": 2, "name": "Sara"}], "meals": null}"#,
    )
    .unwrap();
    let report = roster
        .restore_backup_keys(&doc, &[keys::STUDENTS, keys::MEALS])
        .unwrap();

    assert_eq!(report.restored, vec![keys::STUDENTS.to_string()]);
    assert_eq!(report.skipped, vec![keys::MEALS.to_string()]);
    assert_eq!(roster.students.len(), 2);
    assert_eq!(roster.meals.get_all()[0].name, "Oats");
    assert_eq!(count(&changes), 1);
}

#[test]
fn test_export_covers_every_collection() {
    let roster = Roster::ephemeral();
    roster.students.save(Student::new("Ali")).unwrap();

    let doc = roster.export_backup();
    let names: Vec<&str> = doc.keys().collect();
    let mut expected = keys::ALL.to_vec();
    expected.sort_unstable();
    assert_eq!(names, expected);

    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value["students"], json!([{"id": 1, "name": "Ali"}]));
    assert_eq!(value["meals"], json!(null));
}

#[test]
fn test_file_round_trip_between_rosters() {
    let (source, temp) = on_disk();
    source.students.save(Student::new("Ali")).unwrap();
    source.supplements.save(Supplement::new("Creatine")).unwrap();
    let file = temp.path().join("backup.json");
    source.export_to_file(&file).unwrap();

    let target = Roster::ephemeral();
    target.students.save(Student::new("Someone else")).unwrap();
    let report = target.restore_from_file(&file).unwrap();

    assert_eq!(report.restored.len(), 2);
    assert_eq!(target.students.get_by_id(RecordId::new(1)).unwrap().name, "Ali");
    assert_eq!(target.students.len(), 1);
    assert_eq!(target.supplements.get_all()[0].name, "Creatine");
    assert!(target.meals.is_empty());
}

#[test]
fn test_restore_from_missing_file() {
    let (roster, temp) = on_disk();
    let err = roster
        .restore_from_file(&temp.path().join("nope.json"))
        .unwrap_err();
    assert!(matches!(err, Error::IoError(_)));
}

#[test]
fn test_restore_from_malformed_file_writes_nothing() {
    let (roster, temp) = on_disk();
    roster.students.save(Student::new("Ali")).unwrap();
    let file = temp.path().join("backup.json");
    std::fs::write(&file, r#"{"students": "everyone"}"#).unwrap();
    let (changes, _id) = change_counter(&roster);

    let err = roster.restore_from_file(&file).unwrap_err();
    assert!(matches!(err, Error::InvalidBackup(_)));
    assert_eq!(roster.students.get_all()[0].name, "Ali");
    assert_eq!(count(&changes), 0);
}

#[test]
fn test_unusable_backup_file_is_reported_to_the_user() {
    let temp = tempfile::TempDir::new().unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let roster = Roster::builder().notifier(notifier.clone()).open().unwrap();

    let truncated = temp.path().join("truncated.json");
    std::fs::write(&truncated, r#"{"students": [{"id": 1"#).unwrap();
    let err = roster.restore_from_file(&truncated).unwrap_err();
    assert!(matches!(err, Error::InvalidBackup(_)));

    let wrong_shape = temp.path().join("wrong.json");
    std::fs::write(&wrong_shape, r#"{"students": 5}"#).unwrap();
    assert!(roster.restore_from_file(&wrong_shape).is_err());

    assert!(roster.restore_from_file(&temp.path().join("missing.json")).is_err());

    let errors = notifier.errors();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|n| n.message == RESTORE_FAILED_MESSAGE));
    assert!(roster.students.is_empty());
}

#[test]
fn test_partial_failure_rolls_back() {
    let store = Arc::new(FaultyStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let roster = Roster::builder()
        .storage(store.clone())
        .notifier(notifier.clone())
        .open()
        .unwrap();
    roster.students.save(Student::new("Ali")).unwrap();
    let before = roster.students.get_all();
    let (changes, _id) = change_counter(&roster);

    store.fail_writes_to(keys::SUPPLEMENTS);
    let doc = BackupDocument::from_json_str(
        r#"{"students": [{"id": 5, "name": "Sara"}], "supplements": [{"id": 1, "name": "Zinc"}]}"#,
    )
    .unwrap();
    let err = roster.restore_backup(&doc).unwrap_err();

    assert!(matches!(
        err,
        Error::RestoreFailed {
            rolled_back: true,
            ..
        }
    ));
    assert_eq!(roster.students.get_all(), before);
    assert!(roster.supplements.is_empty());
    assert_eq!(count(&changes), 0);
    assert_eq!(
        notifier.notices().last().map(|n| n.kind),
        Some(NoticeKind::Error)
    );
}
