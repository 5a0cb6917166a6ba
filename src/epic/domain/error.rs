//! Error types for epic validation and association checks.

use super::EpicId;
use crate::task::domain::TaskId;
use thiserror::Error;

/// Errors returned while constructing epic values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EpicDomainError {
    /// The epic title is empty after trimming.
    #[error("epic title must not be empty")]
    EmptyTitle,
}

/// A destructive operation was refused because of an epic/task link.
///
/// Not retryable: the link has to be removed first.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EpicGuardError {
    /// The task is still linked to an epic.
    #[error("blocked by association: task {task_id} is linked to epic {epic_id}; unlink it first")]
    TaskLinkedToEpic {
        /// Task that was about to be deleted.
        task_id: TaskId,
        /// Epic it is linked to.
        epic_id: EpicId,
    },

    /// The epic still has linked tasks.
    #[error("blocked by association: epic {epic_id} still has {task_count} linked task(s)")]
    EpicHasTasks {
        /// Epic that was about to be deleted.
        epic_id: EpicId,
        /// Number of tasks still linked.
        task_count: usize,
    },
}
