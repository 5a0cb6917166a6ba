//! Repository port for sprint persistence.

use crate::sprint::domain::{
    NewSprint, Sprint, SprintDomainError, SprintId, SprintMigration, SprintPatch, SprintState,
};
use crate::workspace::domain::WorkspaceId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for sprint repository operations.
pub type SprintRepositoryResult<T> = Result<T, SprintRepositoryError>;

/// Sprint persistence contract.
///
/// Implementations are authoritative for the single-active-sprint invariant:
/// `activate` must refuse while another sprint of the workspace is active.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SprintRepository: Send + Sync {
    /// Lists the sprints of a workspace in creation order, optionally
    /// filtered by state.
    async fn list(
        &self,
        workspace_id: WorkspaceId,
        state: Option<SprintState>,
    ) -> SprintRepositoryResult<Vec<Sprint>>;

    /// Finds a sprint by identifier.
    async fn find_by_id(&self, id: SprintId) -> SprintRepositoryResult<Option<Sprint>>;

    /// Creates a sprint in planning and assigns its identifier.
    async fn create(&self, draft: NewSprint) -> SprintRepositoryResult<Sprint>;

    /// Edits a sprint's name or planned dates.
    ///
    /// # Errors
    ///
    /// Returns [`SprintRepositoryError::NotFound`] for unknown sprints and
    /// [`SprintRepositoryError::Rejected`] when the sprint is closed or the
    /// patch is invalid.
    async fn update(&self, id: SprintId, patch: SprintPatch) -> SprintRepositoryResult<Sprint>;

    /// Activates a sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintRepositoryError::ActiveSprintExists`] when another
    /// sprint of the workspace is active and
    /// [`SprintRepositoryError::Rejected`] for invalid transitions.
    async fn activate(&self, id: SprintId) -> SprintRepositoryResult<Sprint>;

    /// Marks a sprint closed, recording the migration applied to its
    /// pending tasks.
    ///
    /// # Errors
    ///
    /// Returns [`SprintRepositoryError::Rejected`] for invalid transitions.
    async fn close(&self, id: SprintId, migration: SprintMigration) -> SprintRepositoryResult<()>;
}

/// Errors returned by sprint repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SprintRepositoryError {
    /// The sprint was not found.
    #[error("sprint not found: {0}")]
    NotFound(SprintId),

    /// Another sprint of the workspace is already active.
    #[error("workspace {workspace_id} already has active sprint {active_sprint_id}")]
    ActiveSprintExists {
        /// Workspace holding the active sprint.
        workspace_id: WorkspaceId,
        /// Currently active sprint.
        active_sprint_id: SprintId,
    },

    /// Persistence refused the change for a domain reason.
    #[error(transparent)]
    Rejected(#[from] SprintDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SprintRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
