//! ChangeBus: in-process "storage changed" broadcast
//!
//! ## Design
//!
//! - One bus per process, shared by every collection as `Arc<dyn EventBus>`.
//! - No payload: listeners re-read the collections they care about.
//! - Synchronous fan-out in subscription order, after the write returned.
//! - The listener list is snapshotted before dispatch, so a listener may
//!   subscribe or unsubscribe (itself included) while being called. Such
//!   changes take effect from the next emit.
//! - No replay: a listener attached after an emit never sees it.
//!
//! Changes made by another process (another handle on the same data
//! directory) do not arrive here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use roster_core::{EventBus, Listener, SubscriptionId};

/// Default [`EventBus`] implementation
pub struct ChangeBus {
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
    emitted: AtomicU64,
}

impl ChangeBus {
    /// Create a bus with no listeners
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            emitted: AtomicU64::new(0),
        }
    }

    /// Number of emits since creation
    pub fn emit_count(&self) -> u64 {
        self.emitted.load(Ordering::Acquire)
    }

    /// Number of current listeners
    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeBus")
            .field("subscribers", &self.subscriber_count())
            .field("emitted", &self.emit_count())
            .finish()
    }
}

impl EventBus for ChangeBus {
    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::AcqRel));
        self.listeners.lock().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn emit(&self) {
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        self.emitted.fetch_add(1, Ordering::AcqRel);
        trace!(listeners = snapshot.len(), "storage changed");
        for listener in snapshot {
            listener();
        }
    }
}

/// Subscription that is removed when dropped
pub struct Subscription {
    bus: Arc<dyn EventBus>,
    id: SubscriptionId,
}

impl Subscription {
    /// Subscribe `listener` to `bus`
    pub fn new(bus: Arc<dyn EventBus>, listener: Listener) -> Self {
        let id = bus.subscribe(listener);
        Self { bus, id }
    }

    /// Handle of the underlying subscription
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.id);
    }
}
