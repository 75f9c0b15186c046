//! Core traits for storage, notification and change broadcast
//!
//! These are the seams the persistence layer is assembled from. Each is
//! constructed once at startup and shared as an `Arc<dyn ...>` by every
//! collection, so backends can be swapped without touching upper layers.

use std::sync::Arc;

use crate::error::Result;
use crate::types::SubscriptionId;

/// Flat string key-value store
///
/// String keys, string values, whole-value reads and writes. No partial
/// updates, no transactions.
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait StoragePort: Send + Sync {
    /// Read the raw value stored at `key`
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` at `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write (quota, I/O, key).
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key succeeds
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<()>;

    /// Enumerate stored keys in ascending order
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Something the user should know failed
    Error,
    /// Confirmation of a completed action
    Success,
}

/// A user-visible notification (the UI shows these as toasts)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub kind: NoticeKind,
    /// Human-readable message
    pub message: String,
}

impl Notice {
    /// Build an error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// Build a success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }
}

/// Sink for user-visible notices
pub trait Notifier: Send + Sync {
    /// Deliver a notice to the user
    fn notify(&self, notice: &Notice);
}

/// Callback invoked on every change notification
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Process-wide "storage changed" broadcast
///
/// Carries no payload: a subscriber re-reads whatever it cares about.
/// There is no replay; a subscriber attached after an emit missed it.
pub trait EventBus: Send + Sync {
    /// Register a listener; returns the handle needed to remove it
    fn subscribe(&self, listener: Listener) -> SubscriptionId;

    /// Remove a listener; returns `false` if the id was not subscribed
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Call every current listener, synchronously, in subscription order
    fn emit(&self);
}
