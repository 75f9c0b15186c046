//! The `Record` trait and a loosely-typed record for generic tooling

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::RecordId;

/// A uniquely identified item stored within a collection
///
/// Collections are generic over any serializable type that exposes its id.
/// A record whose id is [`RecordId::UNASSIGNED`] receives one on first save.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The record's id
    fn id(&self) -> RecordId;

    /// Overwrite the record's id (used by the allocator on insert)
    fn set_id(&mut self, id: RecordId);
}

/// Implement [`Record`] for structs with a public `id: RecordId` field.
#[macro_export]
macro_rules! impl_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::record::Record for $ty {
                fn id(&self) -> $crate::types::RecordId {
                    self.id
                }

                fn set_id(&mut self, id: $crate::types::RecordId) {
                    self.id = id;
                }
            }
        )+
    };
}

/// Record with an id and arbitrary JSON fields
///
/// Used where the record shape is not known statically, e.g. tools that list
/// any collection. Field order of the source object is not preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicRecord {
    /// Record id
    #[serde(default)]
    pub id: RecordId,
    /// Every other field
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DynamicRecord {
    /// Create an unsaved record from a field map
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            id: RecordId::UNASSIGNED,
            fields,
        }
    }

    /// Builder-style field insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl_record!(DynamicRecord);
