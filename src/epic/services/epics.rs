//! Service layer for epic creation and guarded deletion.

use super::EpicAssociationGuard;
use crate::epic::{
    domain::{Epic, EpicDomainError, EpicGuardError, EpicId},
    ports::{EpicRepository, EpicRepositoryError},
};
use crate::workspace::domain::WorkspaceId;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for epic operations.
#[derive(Debug, Error)]
pub enum EpicServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] EpicDomainError),
    /// Deletion refused by the association guard.
    #[error(transparent)]
    BlockedByAssociation(#[from] EpicGuardError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] EpicRepositoryError),
    /// No epic exists with the given identifier.
    #[error("epic {0} not found")]
    NotFound(EpicId),
}

/// Result type for epic service operations.
pub type EpicServiceResult<T> = Result<T, EpicServiceError>;

/// Epic orchestration service.
#[derive(Clone)]
pub struct EpicService<E>
where
    E: EpicRepository,
{
    repository: Arc<E>,
}

impl<E> EpicService<E>
where
    E: EpicRepository,
{
    /// Creates a new epic service.
    #[must_use]
    pub const fn new(repository: Arc<E>) -> Self {
        Self { repository }
    }

    /// Creates an epic in a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`EpicServiceError::Domain`] for a blank title or repository
    /// errors when persistence fails.
    pub async fn create(
        &self,
        workspace_id: WorkspaceId,
        title: impl Into<String> + Send,
    ) -> EpicServiceResult<Epic> {
        let epic = Epic::new(EpicId::new(), workspace_id, title)?;
        self.repository.store(&epic).await?;
        Ok(epic)
    }

    /// Lists the epics of a workspace with their linked-task counts.
    ///
    /// # Errors
    ///
    /// Returns repository errors when persistence fails.
    pub async fn list(&self, workspace_id: WorkspaceId) -> EpicServiceResult<Vec<Epic>> {
        Ok(self.repository.list(workspace_id).await?)
    }

    /// Deletes an epic once no task links to it.
    ///
    /// # Errors
    ///
    /// Returns [`EpicServiceError::NotFound`] for unknown epics,
    /// [`EpicServiceError::BlockedByAssociation`] while tasks are linked, and
    /// repository errors when persistence fails.
    pub async fn delete(&self, epic_id: EpicId) -> EpicServiceResult<()> {
        let epic = self
            .repository
            .find_by_id(epic_id)
            .await?
            .ok_or(EpicServiceError::NotFound(epic_id))?;
        EpicAssociationGuard::ensure_epic_deletable(&epic)?;
        self.repository.delete(epic_id).await?;
        info!(%epic_id, "epic deleted");
        Ok(())
    }
}
