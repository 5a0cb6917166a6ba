//! Error types for task domain validation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or patching task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The due date precedes the start date.
    #[error("task due date {due} is before its start date {start}")]
    InvalidSchedule {
        /// Requested start date.
        start: NaiveDate,
        /// Requested due date.
        due: NaiveDate,
    },
}
