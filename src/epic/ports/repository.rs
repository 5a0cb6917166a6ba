//! Repository port for epic persistence.

use crate::epic::domain::{Epic, EpicId};
use crate::workspace::domain::WorkspaceId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for epic repository operations.
pub type EpicRepositoryResult<T> = Result<T, EpicRepositoryError>;

/// Epic persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EpicRepository: Send + Sync {
    /// Stores a new epic.
    ///
    /// # Errors
    ///
    /// Returns [`EpicRepositoryError::DuplicateEpic`] when the identifier
    /// already exists.
    async fn store(&self, epic: &Epic) -> EpicRepositoryResult<()>;

    /// Finds an epic with its current linked-task count.
    async fn find_by_id(&self, id: EpicId) -> EpicRepositoryResult<Option<Epic>>;

    /// Lists the epics of a workspace.
    async fn list(&self, workspace_id: WorkspaceId) -> EpicRepositoryResult<Vec<Epic>>;

    /// Deletes an epic.
    ///
    /// # Errors
    ///
    /// Returns [`EpicRepositoryError::NotFound`] when the epic does not exist.
    async fn delete(&self, id: EpicId) -> EpicRepositoryResult<()>;
}

/// Errors returned by epic repository implementations.
#[derive(Debug, Clone, Error)]
pub enum EpicRepositoryError {
    /// An epic with the same identifier already exists.
    #[error("duplicate epic identifier: {0}")]
    DuplicateEpic(EpicId),

    /// The epic was not found.
    #[error("epic not found: {0}")]
    NotFound(EpicId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EpicRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
