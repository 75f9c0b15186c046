//! roster.toml handling on open

use rosterdb::{Error, Roster, RosterConfig, Student, CONFIG_FILE_NAME};
use tempfile::TempDir;

#[test]
fn test_first_open_creates_commented_config() {
    let temp = TempDir::new().unwrap();
    Roster::open(temp.path()).unwrap();

    let text = std::fs::read_to_string(temp.path().join(CONFIG_FILE_NAME)).unwrap();
    assert!(text.contains("durability = \"standard\""));
    assert!(text.starts_with('#'));
}

#[test]
fn test_edited_config_is_used() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join(CONFIG_FILE_NAME),
        "durability = \"always\"\nquota_bytes = 0\n",
    )
    .unwrap();

    let roster = Roster::open(temp.path()).unwrap();
    assert_eq!(roster.config().quota(), None);
    assert!(roster.config().sync_writes().unwrap());

    let big = Student::new("x".repeat(10 * 1024 * 1024));
    roster.students.save(big).unwrap();
}

#[test]
fn test_tight_quota_rejects_large_write() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join(CONFIG_FILE_NAME), "quota_bytes = 128\n").unwrap();
    let roster = Roster::open(temp.path()).unwrap();

    roster.students.save(Student::new("Ali")).unwrap();
    let err = roster
        .students
        .save(Student::new("z".repeat(512)))
        .unwrap_err();
    assert!(err.is_quota_exceeded());
    assert_eq!(roster.students.len(), 1);
}

#[test]
fn test_invalid_config_fails_open() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join(CONFIG_FILE_NAME), "durability = \"never\"\n").unwrap();

    let err = Roster::open(temp.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn test_explicit_config_skips_file() {
    let temp = TempDir::new().unwrap();
    let roster = Roster::builder()
        .path(temp.path())
        .config(RosterConfig::default())
        .open()
        .unwrap();

    assert!(!temp.path().join(CONFIG_FILE_NAME).exists());
    assert!(!roster.is_ephemeral());
}
