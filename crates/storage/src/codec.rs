//! SafeCodec: JSON encode/decode over a storage port that never panics
//!
//! - Reads resolve failures to a caller-supplied fallback and log them.
//! - Writes convert failures into a logged error, a user-visible
//!   "Could not save data" notice, and a typed `Err`.
//!
//! No change notification is emitted here; that belongs to the collection
//! layer above.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use roster_core::{Error, Notice, Notifier, Result, StoragePort};

/// Message shown to the user when a write fails
pub const SAVE_FAILED_MESSAGE: &str = "Could not save data";

/// Safe serialization wrapper around a storage port
///
/// Cheap to clone: both halves are shared.
#[derive(Clone)]
pub struct SafeCodec {
    port: Arc<dyn StoragePort>,
    notifier: Arc<dyn Notifier>,
}

impl SafeCodec {
    /// Create a codec over `port`, reporting write failures to `notifier`
    pub fn new(port: Arc<dyn StoragePort>, notifier: Arc<dyn Notifier>) -> Self {
        Self { port, notifier }
    }

    /// The underlying storage port
    pub fn port(&self) -> &Arc<dyn StoragePort> {
        &self.port
    }

    /// The notifier write failures are reported to
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Load and decode the value at `key`
    ///
    /// Returns `fallback` unchanged when the key is absent, when its content
    /// is not valid JSON for `T`, or when the backend cannot be read.
    pub fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.port.get(key) {
            Ok(None) => fallback,
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!(key = %key, error = %e, "stored value is unreadable, using fallback");
                    fallback
                }
            },
            Err(e) => {
                warn!(key = %key, error = %e, "storage read failed, using fallback");
                fallback
            }
        }
    }

    /// Encode `value` and write it at `key`
    ///
    /// # Errors
    ///
    /// Returns the serialization or storage error after logging it and
    /// notifying the user.
    pub fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                let err = Error::from(e);
                self.report_write_failure(key, &err);
                return Err(err);
            }
        };
        self.port.set(key, &raw).map_err(|err| {
            self.report_write_failure(key, &err);
            err
        })
    }

    /// Read the raw stored text at `key` without decoding
    ///
    /// # Errors
    ///
    /// Returns the backend's read error.
    pub fn raw(&self, key: &str) -> Result<Option<String>> {
        self.port.get(key)
    }

    /// Put raw text back at `key`, or remove the key when `raw` is `None`
    ///
    /// Used to undo writes; failures are logged but not shown to the user.
    ///
    /// # Errors
    ///
    /// Returns the backend's write error.
    pub fn put_raw(&self, key: &str, raw: Option<&str>) -> Result<()> {
        let result = match raw {
            Some(raw) => self.port.set(key, raw),
            None => self.port.remove(key),
        };
        if let Err(e) = &result {
            error!(key = %key, error = %e, "raw write failed");
        }
        result
    }

    /// Enumerate stored keys
    ///
    /// # Errors
    ///
    /// Returns the backend's read error.
    pub fn keys(&self) -> Result<Vec<String>> {
        self.port.keys()
    }

    /// Show an error notice to the user
    pub fn notify_error(&self, message: &str) {
        self.notifier.notify(&Notice::error(message));
    }

    /// Show a success notice to the user
    pub fn notify_success(&self, message: &str) {
        self.notifier.notify(&Notice::success(message));
    }

    fn report_write_failure(&self, key: &str, err: &Error) {
        error!(key = %key, error = %err, "storage write failed");
        self.notify_error(SAVE_FAILED_MESSAGE);
    }
}
