//! In-memory preference store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::session::{
    domain::{SessionPreferences, UserId},
    ports::{PreferenceStore, PreferenceStoreError, PreferenceStoreResult},
};

/// Thread-safe in-memory preference store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferenceStore {
    entries: Arc<RwLock<HashMap<UserId, SessionPreferences>>>,
}

impl InMemoryPreferenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn load(&self, user: UserId) -> PreferenceStoreResult<SessionPreferences> {
        let entries = self.entries.read().map_err(|err| {
            PreferenceStoreError::storage(std::io::Error::other(err.to_string()))
        })?;
        Ok(entries.get(&user).copied().unwrap_or_default())
    }

    async fn save(
        &self,
        user: UserId,
        preferences: SessionPreferences,
    ) -> PreferenceStoreResult<()> {
        let mut entries = self.entries.write().map_err(|err| {
            PreferenceStoreError::storage(std::io::Error::other(err.to_string()))
        })?;
        entries.insert(user, preferences);
        Ok(())
    }
}
