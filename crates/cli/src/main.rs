//! Roster CLI: inspect and maintain a roster data directory.
//!
//! `roster [flags] COMMAND` runs one command and exits. Logs go to stderr,
//! results to stdout.

mod commands;
mod format;
mod parse;

use std::path::Path;
use std::process;

use rosterdb::{keys, Collection, DynamicRecord, Error, Roster};
use tracing::{debug, Level};

use commands::build_cli;
use format::{
    format_count, format_error, format_keys, format_record, format_records, format_report,
    OutputMode,
};
use parse::{matches_to_action, CliAction};

const DEFAULT_DB_PATH: &str = ".roster";

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(2);
        }
    };

    let roster = match open_roster(&matches) {
        Ok(roster) => roster,
        Err(e) => {
            eprintln!("Failed to open roster: {}", e);
            process::exit(1);
        }
    };

    match run(&roster, action, mode) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            process::exit(1);
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_roster(matches: &clap::ArgMatches) -> Result<Roster, Error> {
    if matches.get_flag("memory") {
        return Ok(Roster::ephemeral());
    }
    let path = matches
        .get_one::<String>("db")
        .map(String::as_str)
        .unwrap_or(DEFAULT_DB_PATH);
    debug!(path = %path, "opening roster");
    Roster::open(path)
}

/// Collections are edited as loosely typed records so the CLI can
/// round-trip fields it does not know about.
fn records(roster: &Roster, key: &str) -> Result<Collection<DynamicRecord>, Error> {
    if keys::ALL.contains(&key) {
        Ok(roster.collection(key))
    } else {
        Err(Error::InvalidKey(format!(
            "'{}' (known collections: {})",
            key,
            keys::ALL.join(", ")
        )))
    }
}

fn run(roster: &Roster, action: CliAction, mode: OutputMode) -> Result<String, Error> {
    match action {
        CliAction::Keys => Ok(format_keys(&roster.stored_keys()?, mode)),
        CliAction::List { collection } => {
            Ok(format_records(&records(roster, &collection)?.get_all(), mode))
        }
        CliAction::Get { collection, id } => {
            let found = records(roster, &collection)?.get_by_id(id);
            Ok(format_record(found.as_ref(), mode))
        }
        CliAction::Save { collection, record } => {
            let saved = records(roster, &collection)?.save(record)?;
            Ok(format_record(Some(&saved), mode))
        }
        CliAction::Delete { collection, ids } => {
            let collection = records(roster, &collection)?;
            let removed = match ids.as_slice() {
                [id] => usize::from(collection.delete(*id)?),
                many => collection.delete_many(many)?,
            };
            Ok(format_count(removed, mode))
        }
        CliAction::Clear { collection } => {
            records(roster, &collection)?.clear()?;
            Ok(String::new())
        }
        CliAction::Export { file: Some(file) } => {
            roster.export_to_file(Path::new(&file))?;
            Ok(String::new())
        }
        CliAction::Export { file: None } => roster.export_backup().to_json_pretty(),
        CliAction::Restore { file, keys } => {
            let report = match keys {
                None => roster.restore_from_file(Path::new(&file))?,
                Some(keys) => {
                    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
                    roster.restore_from_file_keys(Path::new(&file), &keys)?
                }
            };
            Ok(format_report(&report, mode))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterdb::RecordId;

    fn save(roster: &Roster, json: &str) -> String {
        let record: DynamicRecord = serde_json::from_str(json).unwrap();
        run(
            roster,
            CliAction::Save {
                collection: keys::STUDENTS.into(),
                record,
            },
            OutputMode::Human,
        )
        .unwrap()
    }

    #[test]
    fn test_save_then_list() {
        let roster = Roster::ephemeral();
        assert_eq!(save(&roster, r#"{"name": "Ali"}"#), "1\t{\"name\":\"Ali\"}");

        let listed = run(
            &roster,
            CliAction::List {
                collection: keys::STUDENTS.into(),
            },
            OutputMode::Human,
        )
        .unwrap();
        assert_eq!(listed, "1\t{\"name\":\"Ali\"}");
    }

    #[test]
    fn test_unknown_collection_is_rejected() {
        let roster = Roster::ephemeral();
        let err = run(
            &roster,
            CliAction::List {
                collection: "gyms".into(),
            },
            OutputMode::Human,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn test_delete_counts() {
        let roster = Roster::ephemeral();
        save(&roster, r#"{"name": "Ali"}"#);
        save(&roster, r#"{"name": "Sara"}"#);

        let out = run(
            &roster,
            CliAction::Delete {
                collection: keys::STUDENTS.into(),
                ids: vec![RecordId::new(1), RecordId::new(2), RecordId::new(9)],
            },
            OutputMode::Json,
        )
        .unwrap();
        assert_eq!(out, "2");
        assert!(roster.students.is_empty());
    }

    #[test]
    fn test_export_and_partial_restore() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("backup.json");
        let roster = Roster::ephemeral();
        save(&roster, r#"{"name": "Ali"}"#);
        run(
            &roster,
            CliAction::Export {
                file: Some(file.display().to_string()),
            },
            OutputMode::Human,
        )
        .unwrap();

        let fresh = Roster::ephemeral();
        let out = run(
            &fresh,
            CliAction::Restore {
                file: file.display().to_string(),
                keys: Some(vec![keys::STUDENTS.into(), keys::MEALS.into()]),
            },
            OutputMode::Human,
        )
        .unwrap();
        assert_eq!(out, "restored: students\nskipped: meals");
        assert_eq!(fresh.students.get_all()[0].name, "Ali");
    }
}
