//! Port for delivering notices to the user.

use crate::session::domain::Notice;

/// Sink for user-facing notices.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Delivers a notice.
    fn notify(&self, notice: Notice);
}
