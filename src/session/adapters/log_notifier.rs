//! Notifier that forwards notices to the tracing log.

use crate::session::{
    domain::{Notice, NoticeLevel},
    ports::Notifier,
};
use tracing::{info, warn};

/// Writes each notice as a log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!(target: "sprintboard::notice", "{}", notice.message),
            NoticeLevel::Error => warn!(target: "sprintboard::notice", "{}", notice.message),
        }
    }
}
