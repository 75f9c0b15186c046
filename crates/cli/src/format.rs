//! Result → human/json string formatting.
//!
//! - **Human** (default): one line per record, `(empty)` / `(nil)` markers
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use rosterdb::{DynamicRecord, Error, RestoreReport};
use serde_json::{json, Value};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({ "error": err.to_string() })),
        OutputMode::Human => format!("(error) {}", err),
    }
}

/// Format a whole collection.
pub fn format_records(records: &[DynamicRecord], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(records).unwrap_or_else(json_failure),
        OutputMode::Human if records.is_empty() => "(empty)".to_string(),
        OutputMode::Human => records
            .iter()
            .map(format_record_line)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Format a lookup result.
pub fn format_record(record: Option<&DynamicRecord>, mode: OutputMode) -> String {
    match (record, mode) {
        (Some(record), OutputMode::Json) => {
            serde_json::to_string_pretty(record).unwrap_or_else(json_failure)
        }
        (None, OutputMode::Json) => "null".to_string(),
        (Some(record), OutputMode::Human) => format_record_line(record),
        (None, OutputMode::Human) => "(nil)".to_string(),
    }
}

/// Format stored key names.
pub fn format_keys(keys: &[String], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(keys).unwrap_or_else(json_failure),
        OutputMode::Human if keys.is_empty() => "(empty)".to_string(),
        OutputMode::Human => keys
            .iter()
            .enumerate()
            .map(|(i, k)| format!("{}) {}", i + 1, k))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Format a count of affected records.
pub fn format_count(count: usize, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => count.to_string(),
        OutputMode::Human => format!("(integer) {}", count),
    }
}

/// Format a restore outcome.
pub fn format_report(report: &RestoreReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({
            "restored": report.restored,
            "skipped": report.skipped,
        })),
        OutputMode::Human => format!(
            "restored: {}\nskipped: {}",
            list_or_none(&report.restored),
            list_or_none(&report.skipped)
        ),
    }
}

fn format_record_line(record: &DynamicRecord) -> String {
    let fields = Value::Object(record.fields.clone());
    format!("{}\t{}", record.id, fields)
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn json_failure(err: serde_json::Error) -> String {
    format!("{{\"error\": \"{}\"}}", err)
}
