//! In-memory sprint repository enforcing the single-active-sprint rule.

use async_trait::async_trait;
use mockable::DefaultClock;
use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use crate::sprint::{
    domain::{NewSprint, Sprint, SprintId, SprintMigration, SprintPatch, SprintState},
    ports::{SprintRepository, SprintRepositoryError, SprintRepositoryResult},
};
use crate::workspace::domain::WorkspaceId;

/// Repository operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SprintOperation {
    /// [`SprintRepository::activate`].
    Activate,
    /// [`SprintRepository::close`].
    Close,
}

/// Thread-safe in-memory sprint repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySprintRepository {
    state: Arc<RwLock<InMemorySprintState>>,
}

#[derive(Debug, Default)]
struct InMemorySprintState {
    sprints: Vec<Sprint>,
    failures: HashSet<SprintOperation>,
}

impl InMemorySprintState {
    fn sprint_mut(&mut self, id: SprintId) -> SprintRepositoryResult<&mut Sprint> {
        self.sprints
            .iter_mut()
            .find(|sprint| sprint.id() == id)
            .ok_or(SprintRepositoryError::NotFound(id))
    }

    fn take_failure(&mut self, operation: SprintOperation) -> SprintRepositoryResult<()> {
        if self.failures.remove(&operation) {
            return Err(SprintRepositoryError::persistence(std::io::Error::other(
                format!("injected {operation:?} failure"),
            )));
        }
        Ok(())
    }
}

impl InMemorySprintRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call of `operation` fail.
    ///
    /// # Errors
    ///
    /// Returns [`SprintRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn fail_next(&self, operation: SprintOperation) -> SprintRepositoryResult<()> {
        self.write_state()?.failures.insert(operation);
        Ok(())
    }

    fn write_state(&self) -> SprintRepositoryResult<RwLockWriteGuard<'_, InMemorySprintState>> {
        self.state.write().map_err(|err| {
            SprintRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl SprintRepository for InMemorySprintRepository {
    async fn list(
        &self,
        workspace_id: WorkspaceId,
        state: Option<SprintState>,
    ) -> SprintRepositoryResult<Vec<Sprint>> {
        let guard = self.state.read().map_err(|err| {
            SprintRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(guard
            .sprints
            .iter()
            .filter(|sprint| sprint.workspace_id() == workspace_id)
            .filter(|sprint| state.is_none_or(|wanted| sprint.state() == wanted))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: SprintId) -> SprintRepositoryResult<Option<Sprint>> {
        let guard = self.state.read().map_err(|err| {
            SprintRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(guard.sprints.iter().find(|sprint| sprint.id() == id).cloned())
    }

    async fn create(&self, draft: NewSprint) -> SprintRepositoryResult<Sprint> {
        let mut guard = self.write_state()?;
        let sprint = Sprint::plan(SprintId::new(), draft, &DefaultClock);
        guard.sprints.push(sprint.clone());
        Ok(sprint)
    }

    async fn update(&self, id: SprintId, patch: SprintPatch) -> SprintRepositoryResult<Sprint> {
        let mut guard = self.write_state()?;
        let sprint = guard.sprint_mut(id)?;
        sprint.apply(patch, &DefaultClock)?;
        Ok(sprint.clone())
    }

    async fn activate(&self, id: SprintId) -> SprintRepositoryResult<Sprint> {
        let mut guard = self.write_state()?;
        guard.take_failure(SprintOperation::Activate)?;
        let workspace_id = guard.sprint_mut(id)?.workspace_id();
        let conflicting = guard.sprints.iter().find(|sprint| {
            sprint.workspace_id() == workspace_id
                && sprint.id() != id
                && sprint.state() == SprintState::Active
        });
        if let Some(active) = conflicting {
            return Err(SprintRepositoryError::ActiveSprintExists {
                workspace_id,
                active_sprint_id: active.id(),
            });
        }
        let sprint = guard.sprint_mut(id)?;
        sprint.activate(&DefaultClock)?;
        Ok(sprint.clone())
    }

    async fn close(&self, id: SprintId, migration: SprintMigration) -> SprintRepositoryResult<()> {
        let mut guard = self.write_state()?;
        guard.take_failure(SprintOperation::Close)?;
        guard.sprint_mut(id)?.close(migration, &DefaultClock)?;
        Ok(())
    }
}
