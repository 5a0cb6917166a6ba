//! Repository port for task persistence.

use crate::sprint::domain::SprintId;
use crate::task::domain::{NewTask, Task, TaskId, TaskPatch};
use crate::workspace::domain::{StepId, WorkspaceId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Sprint filter applied when listing tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintScope {
    /// No sprint filtering; used by Kanban workspaces.
    #[default]
    Unscoped,
    /// Only tasks without a sprint.
    Backlog,
    /// Only tasks in the given sprint.
    Sprint(SprintId),
}

impl SprintScope {
    /// Returns whether a task with the given sprint falls inside this scope.
    #[must_use]
    pub fn includes(self, sprint_id: Option<SprintId>) -> bool {
        match self {
            Self::Unscoped => true,
            Self::Backlog => sprint_id.is_none(),
            Self::Sprint(expected) => sprint_id == Some(expected),
        }
    }
}

/// Filter for listing tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuery {
    /// Workspace the tasks belong to.
    pub workspace_id: WorkspaceId,
    /// Optional step filter.
    pub step_id: Option<StepId>,
    /// Sprint filter.
    pub sprint: SprintScope,
}

impl TaskQuery {
    /// Lists every task of a workspace.
    #[must_use]
    pub const fn workspace(workspace_id: WorkspaceId) -> Self {
        Self {
            workspace_id,
            step_id: None,
            sprint: SprintScope::Unscoped,
        }
    }

    /// Narrows the query to a sprint scope.
    #[must_use]
    pub const fn in_scope(mut self, sprint: SprintScope) -> Self {
        self.sprint = sprint;
        self
    }

    /// Narrows the query to one step.
    #[must_use]
    pub const fn at_step(mut self, step_id: StepId) -> Self {
        self.step_id = Some(step_id);
        self
    }

    /// Returns whether `task` satisfies every filter of the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        task.workspace_id() == self.workspace_id
            && self.step_id.is_none_or(|step_id| task.step_id() == step_id)
            && self.sprint.includes(task.sprint_id())
    }
}

/// Task persistence contract.
///
/// This is the authoritative source of task state; board caches follow it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Lists tasks matching the query in storage order.
    async fn list(&self, query: TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Fetches one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn get(&self, id: TaskId) -> TaskRepositoryResult<Task>;

    /// Creates a task and assigns its identifier.
    async fn create(&self, draft: NewTask) -> TaskRepositoryResult<Task>;

    /// Applies a patch to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::Rejected`] when the patch is invalid.
    async fn update(&self, id: TaskId, patch: TaskPatch) -> TaskRepositoryResult<Task>;

    /// Deletes a batch of tasks; the batch fails as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when any task is missing.
    async fn delete_many(&self, ids: Vec<TaskId>) -> TaskRepositoryResult<()>;

    /// Moves a task to another step and returns the canonical record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn move_to_step(&self, id: TaskId, step_id: StepId) -> TaskRepositoryResult<Task>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The persistence layer refused the change.
    #[error("task {task_id} rejected: {reason}")]
    Rejected {
        /// Task the change targeted.
        task_id: TaskId,
        /// Reason reported by persistence.
        reason: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
