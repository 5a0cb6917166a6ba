//! In-memory epic repository that derives task counts from a task store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::epic::{
    domain::{Epic, EpicId},
    ports::{EpicRepository, EpicRepositoryError, EpicRepositoryResult},
};
use crate::task::adapters::memory::InMemoryTaskRepository;
use crate::workspace::domain::WorkspaceId;

/// Thread-safe in-memory epic repository.
///
/// Linked-task counts are computed on read from the shared task repository,
/// so unlinking a task is reflected immediately.
#[derive(Debug, Clone)]
pub struct InMemoryEpicRepository {
    epics: Arc<RwLock<HashMap<EpicId, Epic>>>,
    tasks: InMemoryTaskRepository,
}

impl InMemoryEpicRepository {
    /// Creates an empty repository counting links in `tasks`.
    #[must_use]
    pub fn new(tasks: InMemoryTaskRepository) -> Self {
        Self {
            epics: Arc::new(RwLock::new(HashMap::new())),
            tasks,
        }
    }

    fn with_count(&self, epic: Epic) -> EpicRepositoryResult<Epic> {
        let tasks = self.tasks.all().map_err(EpicRepositoryError::persistence)?;
        let count = tasks
            .iter()
            .filter(|task| task.epic_id() == Some(epic.id()))
            .count();
        Ok(epic.with_task_count(count))
    }
}

#[async_trait]
impl EpicRepository for InMemoryEpicRepository {
    async fn store(&self, epic: &Epic) -> EpicRepositoryResult<()> {
        let mut epics = self.epics.write().map_err(|err| {
            EpicRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if epics.contains_key(&epic.id()) {
            return Err(EpicRepositoryError::DuplicateEpic(epic.id()));
        }
        epics.insert(epic.id(), epic.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: EpicId) -> EpicRepositoryResult<Option<Epic>> {
        let found = {
            let epics = self.epics.read().map_err(|err| {
                EpicRepositoryError::persistence(std::io::Error::other(err.to_string()))
            })?;
            epics.get(&id).cloned()
        };
        found.map(|epic| self.with_count(epic)).transpose()
    }

    async fn list(&self, workspace_id: WorkspaceId) -> EpicRepositoryResult<Vec<Epic>> {
        let matching: Vec<Epic> = {
            let epics = self.epics.read().map_err(|err| {
                EpicRepositoryError::persistence(std::io::Error::other(err.to_string()))
            })?;
            epics
                .values()
                .filter(|epic| epic.workspace_id() == workspace_id)
                .cloned()
                .collect()
        };
        matching
            .into_iter()
            .map(|epic| self.with_count(epic))
            .collect()
    }

    async fn delete(&self, id: EpicId) -> EpicRepositoryResult<()> {
        let mut epics = self.epics.write().map_err(|err| {
            EpicRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        epics
            .remove(&id)
            .map(|_| ())
            .ok_or(EpicRepositoryError::NotFound(id))
    }
}
