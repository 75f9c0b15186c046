//! ArgMatches → CliAction conversion.

use clap::ArgMatches;
use rosterdb::{DynamicRecord, RecordId};

/// The result of parsing the command line.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    Keys,
    List { collection: String },
    Get { collection: String, id: RecordId },
    Save { collection: String, record: DynamicRecord },
    Delete { collection: String, ids: Vec<RecordId> },
    Clear { collection: String },
    Export { file: Option<String> },
    Restore { file: String, keys: Option<Vec<String>> },
}

/// Translate the matched subcommand into an action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| "no command given".to_string())?;

    let action = match name {
        "keys" => CliAction::Keys,
        "list" => CliAction::List {
            collection: collection(sub)?,
        },
        "get" => CliAction::Get {
            collection: collection(sub)?,
            id: sub
                .get_one::<u64>("id")
                .map(|id| RecordId::new(*id))
                .ok_or_else(|| "missing id".to_string())?,
        },
        "save" => {
            let source = sub
                .get_one::<String>("record")
                .ok_or_else(|| "missing record".to_string())?;
            CliAction::Save {
                collection: collection(sub)?,
                record: parse_record(&read_source(source)?)?,
            }
        }
        "delete" => CliAction::Delete {
            collection: collection(sub)?,
            ids: sub
                .get_many::<u64>("id")
                .map(|ids| ids.map(|id| RecordId::new(*id)).collect())
                .unwrap_or_default(),
        },
        "clear" => CliAction::Clear {
            collection: collection(sub)?,
        },
        "export" => CliAction::Export {
            file: sub.get_one::<String>("file").cloned(),
        },
        "restore" => CliAction::Restore {
            file: sub
                .get_one::<String>("file")
                .cloned()
                .ok_or_else(|| "missing backup file".to_string())?,
            keys: sub
                .get_many::<String>("keys")
                .map(|keys| keys.cloned().collect()),
        },
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(action)
}

fn collection(sub: &ArgMatches) -> Result<String, String> {
    sub.get_one::<String>("collection")
        .cloned()
        .ok_or_else(|| "missing collection".to_string())
}

/// `@path` reads the file, anything else is taken literally.
fn read_source(source: &str) -> Result<String, String> {
    match source.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {}", path, e)),
        None => Ok(source.to_string()),
    }
}

fn parse_record(text: &str) -> Result<DynamicRecord, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| format!("invalid JSON: {}", e))?;
    if !value.is_object() {
        return Err("a record must be a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| format!("invalid record: {}", e))
}
