//! Destination for unfinished tasks when a sprint closes.

use super::SprintId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the pending tasks of a closing sprint are relocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum SprintMigration {
    /// Send pending tasks to the backlog.
    Backlog,
    /// Move pending tasks into another open sprint.
    Sprint {
        /// Destination sprint.
        sprint_id: SprintId,
    },
}

impl SprintMigration {
    /// Creates a migration into another sprint.
    #[must_use]
    pub const fn to_sprint(sprint_id: SprintId) -> Self {
        Self::Sprint { sprint_id }
    }

    /// Returns the sprint pending tasks will belong to; `None` is backlog.
    #[must_use]
    pub const fn destination(self) -> Option<SprintId> {
        match self {
            Self::Backlog => None,
            Self::Sprint { sprint_id } => Some(sprint_id),
        }
    }
}

impl fmt::Display for SprintMigration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backlog => f.write_str("backlog"),
            Self::Sprint { sprint_id } => write!(f, "sprint {sprint_id}"),
        }
    }
}
