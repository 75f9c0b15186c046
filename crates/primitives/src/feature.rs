//! FeatureStore: live in-memory view of one collection
//!
//! A feature screen keeps its list in memory, saves and deletes through the
//! collection, and refreshes whenever anything in the process signals a
//! storage change.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::debug;

use roster_core::{Record, RecordId, Result};

use crate::collection::Collection;
use crate::events::Subscription;

/// Collection plus a snapshot that tracks every change signal
///
/// The snapshot is refreshed synchronously on the emitting thread, so after
/// `handle_save` returns, `items()` already includes the saved record.
/// Dropping the store ends its subscription.
pub struct FeatureStore<T: Record> {
    collection: Collection<T>,
    items: Arc<RwLock<Vec<T>>>,
    _subscription: Subscription,
}

impl<T: Record> FeatureStore<T> {
    /// Load `collection` and start following change signals
    pub fn attach(collection: Collection<T>) -> Self {
        let items = Arc::new(RwLock::new(collection.get_all()));

        let weak: Weak<RwLock<Vec<T>>> = Arc::downgrade(&items);
        let source = collection.clone();
        let subscription = Subscription::new(
            Arc::clone(collection.bus()),
            Arc::new(move || {
                if let Some(items) = weak.upgrade() {
                    *items.write() = source.get_all();
                }
            }),
        );

        debug!(key = %collection.key(), "feature store attached");
        Self {
            collection,
            items,
            _subscription: subscription,
        }
    }

    /// Current snapshot
    pub fn items(&self) -> Vec<T> {
        self.items.read().clone()
    }

    /// Record with `id` from the snapshot
    pub fn get(&self, id: RecordId) -> Option<T> {
        self.items.read().iter().find(|r| r.id() == id).cloned()
    }

    /// Save through the collection
    ///
    /// # Errors
    ///
    /// Returns the write error; the snapshot is unchanged.
    pub fn handle_save(&self, record: T) -> Result<T> {
        self.collection.save(record)
    }

    /// Delete through the collection
    ///
    /// # Errors
    ///
    /// Returns the write error; the snapshot is unchanged.
    pub fn handle_delete(&self, id: RecordId) -> Result<bool> {
        self.collection.delete(id)
    }

    /// Re-read the collection without waiting for a signal
    pub fn refresh(&self) {
        *self.items.write() = self.collection.get_all();
    }

    /// The underlying collection
    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }
}
