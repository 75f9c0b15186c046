//! Testing utilities for the persistence layer
//!
//! - **FaultyStore**: storage port with injectable read/write failures
//! - **RecordingNotifier**: captures user-visible notices for assertions
//!
//! # Example
//!
//! ```ignore
//! use roster_storage::testing::{FaultyStore, RecordingNotifier};
//!
//! let store = Arc::new(FaultyStore::new());
//! store.fail_writes_to("students");
//! let notifier = Arc::new(RecordingNotifier::new());
//! // ... exercise a collection, then:
//! assert_eq!(notifier.errors().len(), 1);
//! ```

mod faulty;

pub use faulty::FaultyStore;

use parking_lot::Mutex;

use roster_core::{Notice, NoticeKind, Notifier};

/// Notifier that keeps every notice it receives
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice so far, oldest first
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Error notices only
    pub fn errors(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .iter()
            .filter(|n| n.kind == NoticeKind::Error)
            .cloned()
            .collect()
    }

    /// Forget recorded notices
    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().push(notice.clone());
    }
}
