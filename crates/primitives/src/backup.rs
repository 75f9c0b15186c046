//! Backup export/restore of whole collections
//!
//! A backup is one JSON object whose top-level fields are storage key names.
//! Each maps to that key's records as a bare array, or `null` when the key
//! held nothing readable at export time:
//!
//! ```json
//! {"students": [{"id": 1, "name": "Ali"}], "meals": null}
//! ```
//!
//! ## Export
//!
//! Export re-reads each requested key. Records are carried as raw JSON
//! values so unknown fields survive the round trip.
//!
//! ## Restore
//!
//! Restore is all-or-nothing. The document is validated before anything is
//! written, the prior contents of every key about to be overwritten are
//! kept, and a failed write puts those contents back. One change signal
//! follows a successful restore; a failed restore emits none.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use roster_core::{Error, EventBus, Result};
use roster_storage::SafeCodec;

use crate::document::{try_read_records, write_records};

/// Message shown to the user after a successful restore
pub const RESTORE_OK_MESSAGE: &str = "Backup restored";

/// Message shown to the user after a failed restore
pub const RESTORE_FAILED_MESSAGE: &str = "Could not restore backup";

// =============================================================================
// Document
// =============================================================================

/// Parsed backup: storage key to records (or `null`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackupDocument {
    entries: BTreeMap<String, Option<Value>>,
}

impl BackupDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse backup text
    ///
    /// # Errors
    ///
    /// `InvalidBackup` when the text is not a JSON object.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidBackup(e.to_string()))
    }

    /// Pretty-printed JSON text
    ///
    /// # Errors
    ///
    /// Returns a serialization error.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Value for `key`: `None` when missing, `Some(None)` when `null`
    pub fn get(&self, key: &str) -> Option<&Option<Value>> {
        self.entries.get(key)
    }

    /// Set the value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: Option<Value>) {
        self.entries.insert(key.into(), value);
    }

    /// Key names in the document, sorted
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of key entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the document names no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of a successful restore
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Keys whose contents were replaced
    pub restored: Vec<String>,
    /// Requested keys left untouched (missing or `null` in the document)
    pub skipped: Vec<String>,
}

// =============================================================================
// Manager
// =============================================================================

/// Exports and restores sets of collection keys
#[derive(Clone)]
pub struct BackupManager {
    codec: SafeCodec,
    bus: Arc<dyn EventBus>,
}

impl BackupManager {
    /// Create a manager over `codec`, signalling restores on `bus`
    pub fn new(codec: SafeCodec, bus: Arc<dyn EventBus>) -> Self {
        Self { codec, bus }
    }

    /// Snapshot `keys` into a document
    pub fn export(&self, keys: &[&str]) -> BackupDocument {
        let mut doc = BackupDocument::new();
        for &key in keys {
            let records = try_read_records::<Value>(&self.codec, key).map(Value::Array);
            doc.insert(key, records);
        }
        info!(keys = keys.len(), "exported backup");
        doc
    }

    /// Parse backup text, telling the user when it is not a valid backup
    ///
    /// # Errors
    ///
    /// `InvalidBackup` when the text is not a JSON object.
    pub fn parse(&self, text: &str) -> Result<BackupDocument> {
        BackupDocument::from_json_str(text).map_err(|e| {
            warn!(error = %e, "backup text rejected");
            self.codec.notify_error(RESTORE_FAILED_MESSAGE);
            e
        })
    }

    /// Overwrite `keys` with the arrays in `doc`
    ///
    /// Keys that are missing or `null` in the document are left untouched.
    /// Document entries for keys not in `keys` are ignored.
    ///
    /// # Errors
    ///
    /// - `InvalidBackup` when a requested entry is neither an array nor
    ///   `null`; nothing has been written.
    /// - `RestoreFailed` when a write fails; keys already written were put
    ///   back as far as possible.
    pub fn restore(&self, doc: &BackupDocument, keys: &[&str]) -> Result<RestoreReport> {
        let mut plan: Vec<(&str, &[Value])> = Vec::new();
        let mut report = RestoreReport::default();

        for &key in keys {
            match doc.get(key) {
                None | Some(None) => report.skipped.push(key.to_string()),
                Some(Some(Value::Array(records))) => plan.push((key, records.as_slice())),
                Some(Some(other)) => {
                    warn!(key = %key, "backup entry is not an array");
                    self.codec.notify_error(RESTORE_FAILED_MESSAGE);
                    return Err(Error::InvalidBackup(format!(
                        "entry for '{}' must be an array or null, found {}",
                        key,
                        json_kind(other)
                    )));
                }
            }
        }

        let mut prior: Vec<(&str, Option<String>)> = Vec::with_capacity(plan.len());
        for &(key, _) in &plan {
            let raw = self.codec.raw(key).map_err(|e| {
                error!(key = %key, error = %e, "cannot read prior contents, restore aborted");
                self.codec.notify_error(RESTORE_FAILED_MESSAGE);
                Error::RestoreFailed {
                    key: key.to_string(),
                    reason: e.to_string(),
                    rolled_back: true,
                }
            })?;
            prior.push((key, raw));
        }

        for (written, &(key, records)) in plan.iter().enumerate() {
            if let Err(e) = write_records(&self.codec, key, records) {
                let rolled_back = self.roll_back(&prior[..written]);
                error!(key = %key, error = %e, rolled_back, "restore failed");
                self.codec.notify_error(RESTORE_FAILED_MESSAGE);
                return Err(Error::RestoreFailed {
                    key: key.to_string(),
                    reason: e.to_string(),
                    rolled_back,
                });
            }
            report.restored.push(key.to_string());
        }

        self.bus.emit();
        info!(
            restored = report.restored.len(),
            skipped = report.skipped.len(),
            "restored backup"
        );
        self.codec.notify_success(RESTORE_OK_MESSAGE);
        Ok(report)
    }

    fn roll_back(&self, prior: &[(&str, Option<String>)]) -> bool {
        prior
            .iter()
            .rev()
            .map(|(key, raw)| self.codec.put_raw(key, raw.as_deref()).is_ok())
            .fold(true, |all, ok| all && ok)
    }
}

impl std::fmt::Debug for BackupManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupManager").finish_non_exhaustive()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
