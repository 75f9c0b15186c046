//! Stored document format of a collection
//!
//! Collections are written as a versioned envelope:
//!
//! ```json
//! {"schemaVersion": 1, "records": [{"id": 1, "name": "Ali"}]}
//! ```
//!
//! Readers also accept a bare JSON array, which is how unversioned data was
//! stored. Absent or unparseable content decodes to no records.
//!
//! Records are decoded one at a time. A record that does not decode is
//! logged and left out of the result, and [`Decoded::skipped`] counts it so
//! writers can refuse to overwrite what they could not read.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use roster_core::Result;
use roster_storage::SafeCodec;

/// Schema version written by this library
pub const SCHEMA_VERSION: u32 = 1;

/// Versioned wrapper around a collection's records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<R> {
    /// Version of the record layout
    pub schema_version: u32,
    /// The records, in collection order
    pub records: R,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Legacy(Vec<Value>),
    Versioned(Envelope<Vec<Value>>),
}

/// Records read from one key
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// Records that decoded, in stored order
    pub records: Vec<T>,
    /// Stored records that did not decode as `T`
    pub skipped: usize,
}

impl<T> Decoded<T> {
    /// True when every stored record decoded
    pub fn is_complete(&self) -> bool {
        self.skipped == 0
    }
}

/// Read every record stored at `key`; never fails
pub fn read_records<T: DeserializeOwned>(codec: &SafeCodec, key: &str) -> Vec<T> {
    try_read_records(codec, key).unwrap_or_default()
}

/// Like [`read_records`], but `None` when the key is absent or unreadable
pub fn try_read_records<T: DeserializeOwned>(codec: &SafeCodec, key: &str) -> Option<Vec<T>> {
    read_document(codec, key).map(|decoded| decoded.records)
}

/// Decode the document at `key` record by record
///
/// `None` when the key is absent or its content is not a collection document.
pub fn read_document<T: DeserializeOwned>(codec: &SafeCodec, key: &str) -> Option<Decoded<T>> {
    let values = match codec.load::<Option<StoredDocument>>(key, None)? {
        StoredDocument::Legacy(values) => values,
        StoredDocument::Versioned(envelope) => {
            if envelope.schema_version > SCHEMA_VERSION {
                warn!(
                    key = %key,
                    stored = envelope.schema_version,
                    supported = SCHEMA_VERSION,
                    "collection was written by a newer schema, reading known fields only"
                );
            }
            envelope.records
        }
    };

    let mut decoded = Decoded {
        records: Vec::with_capacity(values.len()),
        skipped: 0,
    };
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(record) => decoded.records.push(record),
            Err(e) => {
                warn!(key = %key, index, error = %e, "skipping record that could not be decoded");
                decoded.skipped += 1;
            }
        }
    }
    Some(decoded)
}

/// Replace the records stored at `key`
///
/// # Errors
///
/// Returns the codec's error (the user has already been notified).
pub fn write_records<T: Serialize>(codec: &SafeCodec, key: &str, records: &[T]) -> Result<()> {
    codec.store(
        key,
        &Envelope {
            schema_version: SCHEMA_VERSION,
            records,
        },
    )
}
