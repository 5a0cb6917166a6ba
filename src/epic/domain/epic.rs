//! Epic aggregate.

use super::{EpicDomainError, EpicId};
use crate::workspace::domain::WorkspaceId;
use serde::{Deserialize, Serialize};

/// Grouping entity aggregating tasks of one workspace.
///
/// `task_count` is computed by persistence from live task links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    id: EpicId,
    workspace_id: WorkspaceId,
    title: String,
    task_count: usize,
}

impl Epic {
    /// Creates an epic with no linked tasks.
    ///
    /// # Errors
    ///
    /// Returns [`EpicDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        id: EpicId,
        workspace_id: WorkspaceId,
        title: impl Into<String>,
    ) -> Result<Self, EpicDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EpicDomainError::EmptyTitle);
        }
        Ok(Self {
            id,
            workspace_id,
            title: trimmed.to_owned(),
            task_count: 0,
        })
    }

    /// Returns a copy carrying the given linked-task count.
    #[must_use]
    pub const fn with_task_count(mut self, task_count: usize) -> Self {
        self.task_count = task_count;
        self
    }

    /// Returns the epic identifier.
    #[must_use]
    pub const fn id(&self) -> EpicId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the number of linked tasks.
    #[must_use]
    pub const fn task_count(&self) -> usize {
        self.task_count
    }
}
