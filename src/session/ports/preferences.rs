//! Port for remembering per-user board selections.

use crate::session::domain::{SessionPreferences, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for preference store operations.
pub type PreferenceStoreResult<T> = Result<T, PreferenceStoreError>;

/// Per-user storage for the selected workspace and sprint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Loads the user's preferences; unknown users get empty preferences.
    async fn load(&self, user: UserId) -> PreferenceStoreResult<SessionPreferences>;

    /// Replaces the user's preferences.
    async fn save(&self, user: UserId, preferences: SessionPreferences)
    -> PreferenceStoreResult<()>;
}

/// Errors returned by preference store implementations.
#[derive(Debug, Clone, Error)]
pub enum PreferenceStoreError {
    /// Storage-layer failure.
    #[error("preference storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl PreferenceStoreError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
