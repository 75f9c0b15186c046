//! Notifier that routes user-visible notices into the log

use tracing::{error, info};

use roster_core::{Notice, NoticeKind, Notifier};

/// Default notifier: error notices go to `error!`, successes to `info!`
///
/// Front ends replace this with one that shows toasts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Error => error!(message = %notice.message, "user notice"),
            NoticeKind::Success => info!(message = %notice.message, "user notice"),
        }
    }
}
