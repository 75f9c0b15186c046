//! Error types for the roster persistence layer
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Reads never surface these errors to callers (they resolve to a fallback);
//! writes, restores and configuration loading do.

use std::io;
use thiserror::Error;

/// Result type alias for roster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the roster persistence layer
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file-backed storage, config files, backup files)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The storage backend refused a write because it would exceed its quota
    #[error("Storage quota exceeded writing '{key}': {requested} bytes requested, limit is {limit}")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Total bytes the store would hold after the write
        requested: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Key cannot be used with the storage backend
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Backup document is malformed
    #[error("Invalid backup: {0}")]
    InvalidBackup(String),

    /// A restore failed partway through writing its keys
    #[error("Restore failed at '{key}': {reason} (rolled back: {rolled_back})")]
    RestoreFailed {
        /// Key whose write failed
        key: String,
        /// Underlying failure
        reason: String,
        /// Whether every key written before the failure was put back
        rolled_back: bool,
    },

    /// Configuration file is missing a value or holds an invalid one
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Some stored records could not be decoded, so the collection cannot be
    /// rewritten from the decoded ones without losing data
    #[error("Collection '{key}' holds {skipped} record(s) that could not be decoded")]
    UndecodedRecords {
        /// Collection key
        key: String,
        /// Number of records that failed to decode
        skipped: usize,
    },

    /// The highest stored id leaves no room for another
    #[error("No ids left in collection '{0}'")]
    IdsExhausted(String),
}

impl Error {
    /// Check if this error came from a storage quota limit.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Error::QuotaExceeded { .. })
    }

    /// Check if this error protects stored records that failed to decode.
    pub fn is_undecoded_records(&self) -> bool {
        matches!(self, Error::UndecodedRecords { .. })
    }

    /// Check if this error is a serialization failure.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Error::SerializationError(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
