//! Error types for sprint validation and state transitions.

use super::{SprintId, SprintState};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or transitioning sprints.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SprintDomainError {
    /// The sprint name is empty after trimming.
    #[error("sprint name must not be empty")]
    EmptyName,

    /// The planned end date precedes the planned start date.
    #[error("sprint end date {end} is before its start date {start}")]
    InvalidDateRange {
        /// Planned start date.
        start: NaiveDate,
        /// Planned end date.
        end: NaiveDate,
    },

    /// The requested lifecycle transition is not allowed.
    #[error("invalid state transition for sprint {sprint_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// Sprint being transitioned.
        sprint_id: SprintId,
        /// Current state.
        from: SprintState,
        /// Requested state.
        to: SprintState,
    },

    /// Closed sprints are kept for history and cannot be edited.
    #[error("sprint {0} is closed and cannot be modified")]
    ClosedSprintImmutable(SprintId),
}

/// Error returned while parsing sprint states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sprint state: {0}")]
pub struct ParseSprintStateError(pub String);
