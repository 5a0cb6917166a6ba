//! Board task cache with optimistic moves and rollback.
//!
//! [`BoardTaskStore`] is a disposable projection of task persistence for one
//! workspace/sprint scope. Persistence stays authoritative: every mutation is
//! confirmed remotely and the cache is patched to follow the canonical
//! record. Drag-and-drop moves are the exception; they are applied locally
//! before the remote call and reverted from a snapshot if it fails.

use super::TasksByStep;
use crate::task::{
    domain::{NewTask, Task, TaskId, TaskPatch},
    ports::{SprintScope, TaskQuery, TaskRepository, TaskRepositoryError},
};
use crate::workspace::domain::{StepId, WorkspaceId};
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Drag-end event emitted by the board UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEndEvent {
    /// Task being dragged.
    pub active: TaskId,
    /// Column the task was dropped on; `None` when dropped outside any column.
    pub over: Option<StepId>,
}

impl DragEndEvent {
    /// Creates a drop onto a column.
    #[must_use]
    pub const fn dropped_on(active: TaskId, over: StepId) -> Self {
        Self {
            active,
            over: Some(over),
        }
    }

    /// Creates a drop outside every column.
    #[must_use]
    pub const fn dropped_outside(active: TaskId) -> Self {
        Self { active, over: None }
    }
}

/// Scope the cache was last loaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedScope {
    /// Workspace of the cached tasks.
    pub workspace_id: WorkspaceId,
    /// Sprint filter applied by the load.
    pub sprint: SprintScope,
}

impl LoadedScope {
    fn includes(&self, task: &Task) -> bool {
        task.workspace_id() == self.workspace_id && self.sprint.includes(task.sprint_id())
    }
}

/// Errors returned by board store operations.
///
/// Whenever one of these is returned the cache is unchanged, or rolled back
/// for failed moves.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Loading tasks failed.
    #[error("failed to load tasks: {0}")]
    Load(#[source] TaskRepositoryError),

    /// Creating a task failed.
    #[error("failed to create task: {0}")]
    Create(#[source] TaskRepositoryError),

    /// Updating a task failed.
    #[error("failed to update task {task_id}: {source}")]
    Update {
        /// Task that was being updated.
        task_id: TaskId,
        /// Underlying persistence failure.
        source: TaskRepositoryError,
    },

    /// Deleting tasks failed.
    #[error("failed to delete tasks: {0}")]
    Delete(#[source] TaskRepositoryError),

    /// Moving a task failed and the move was rolled back.
    #[error("failed to move task {task_id}; it was returned to its previous column: {source}")]
    Move {
        /// Task that was being moved.
        task_id: TaskId,
        /// Underlying persistence failure.
        source: TaskRepositoryError,
    },

    /// Another mutation on the task is still in flight.
    #[error("task {0} already has a change in progress")]
    MutationInFlight(TaskId),

    /// The task is not present on the board.
    #[error("task {0} is not on the board")]
    NotCached(TaskId),

    /// A newer load replaced this one before it completed.
    #[error("load for workspace {workspace_id} was superseded by a newer request")]
    Superseded {
        /// Workspace of the discarded load.
        workspace_id: WorkspaceId,
    },

    /// The cache lock was poisoned.
    #[error("board cache unavailable: {0}")]
    CacheUnavailable(String),
}

/// Result type for board store operations.
pub type BoardResult<T> = Result<T, BoardError>;

#[derive(Debug, Default)]
struct BoardState {
    tasks: Vec<Task>,
    scope: Option<LoadedScope>,
    generation: u64,
    settled_generation: u64,
    pending: HashSet<TaskId>,
}

impl BoardState {
    fn projection(&self) -> TasksByStep {
        TasksByStep::from_tasks(&self.tasks)
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    /// Replaces a cached entry in place, keeping its arrival position.
    fn replace(&mut self, canonical: Task) -> bool {
        self.task_mut(canonical.id()).map(|slot| *slot = canonical).is_some()
    }

    fn ensure_idle(&self, id: TaskId) -> BoardResult<()> {
        if self.pending.contains(&id) {
            return Err(BoardError::MutationInFlight(id));
        }
        Ok(())
    }
}

/// Clears a task's pending marker when the owning operation finishes or is
/// dropped mid-flight.
struct PendingMarker {
    state: Arc<RwLock<BoardState>>,
    task_id: TaskId,
}

impl Drop for PendingMarker {
    fn drop(&mut self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .remove(&self.task_id);
    }
}

/// Client-side cache of board tasks for one workspace/sprint scope.
pub struct BoardTaskStore<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
    state: Arc<RwLock<BoardState>>,
}

impl<R> BoardTaskStore<R>
where
    R: TaskRepository,
{
    /// Creates an empty store backed by `repository`.
    #[must_use]
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            state: Arc::new(RwLock::new(BoardState::default())),
        }
    }

    /// Returns the current task-by-step projection.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CacheUnavailable`] when the cache lock is
    /// poisoned.
    pub fn snapshot(&self) -> BoardResult<TasksByStep> {
        Ok(self.read_state()?.projection())
    }

    /// Returns cached tasks in arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CacheUnavailable`] when the cache lock is
    /// poisoned.
    pub fn tasks(&self) -> BoardResult<Vec<Task>> {
        Ok(self.read_state()?.tasks.clone())
    }

    /// Returns a cached task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CacheUnavailable`] when the cache lock is
    /// poisoned.
    pub fn cached(&self, id: TaskId) -> BoardResult<Option<Task>> {
        Ok(self
            .read_state()?
            .tasks
            .iter()
            .find(|task| task.id() == id)
            .cloned())
    }

    /// Returns the scope of the last successful load.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CacheUnavailable`] when the cache lock is
    /// poisoned.
    pub fn scope(&self) -> BoardResult<Option<LoadedScope>> {
        Ok(self.read_state()?.scope)
    }

    /// Returns whether the most recent load is still in flight.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CacheUnavailable`] when the cache lock is
    /// poisoned.
    pub fn is_loading(&self) -> BoardResult<bool> {
        let state = self.read_state()?;
        Ok(state.settled_generation < state.generation)
    }

    /// Replaces the cache with the tasks of a workspace and sprint scope.
    ///
    /// Each call takes a generation ticket; a response arriving after a newer
    /// load was issued is discarded with [`BoardError::Superseded`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Load`] when persistence fails, leaving the
    /// previous cache in place.
    pub async fn load_by_workspace(
        &self,
        workspace_id: WorkspaceId,
        sprint: SprintScope,
    ) -> BoardResult<TasksByStep> {
        let ticket = {
            let mut state = self.write_state()?;
            state.generation += 1;
            state.generation
        };
        debug!(%workspace_id, ?sprint, ticket, "loading board tasks");

        let query = TaskQuery::workspace(workspace_id).in_scope(sprint);
        let result = self.repository.list(query).await;

        let mut state = self.write_state()?;
        if state.generation != ticket {
            debug!(%workspace_id, ticket, latest = state.generation, "discarding stale board load");
            return Err(BoardError::Superseded { workspace_id });
        }
        state.settled_generation = ticket;
        match result {
            Ok(tasks) => {
                debug!(%workspace_id, count = tasks.len(), "board tasks loaded");
                state.tasks = tasks;
                state.scope = Some(LoadedScope {
                    workspace_id,
                    sprint,
                });
                Ok(state.projection())
            }
            Err(err) => {
                warn!(%workspace_id, error = %err, "board load failed; keeping previous cache");
                Err(BoardError::Load(err))
            }
        }
    }

    /// Creates a task remotely and appends the canonical record.
    ///
    /// The record is appended only when it belongs to the loaded scope and is
    /// not already cached.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Create`] when persistence fails; nothing is
    /// added to the cache.
    pub async fn create(&self, draft: NewTask) -> BoardResult<TasksByStep> {
        let created = self
            .repository
            .create(draft)
            .await
            .map_err(BoardError::Create)?;
        let canonical = self
            .repository
            .get(created.id())
            .await
            .map_err(BoardError::Create)?;

        let mut state = self.write_state()?;
        let in_scope = state.scope.is_none_or(|scope| scope.includes(&canonical));
        let already_cached = state.tasks.iter().any(|task| task.id() == canonical.id());
        if in_scope && !already_cached {
            state.tasks.push(canonical);
        }
        info!(task_id = %created.id(), in_scope, "task created");
        Ok(state.projection())
    }

    /// Updates a task remotely and replaces its cached entry in place.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MutationInFlight`] when the task already has a
    /// change in progress and [`BoardError::Update`] when persistence fails;
    /// the cached entry is left unchanged.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> BoardResult<TasksByStep> {
        let marker = self.mark_pending(id)?;

        let result = match self.repository.update(id, patch).await {
            Ok(_) => self.repository.get(id).await,
            Err(err) => Err(err),
        };

        let outcome = {
            let mut state = self.write_state()?;
            match result {
                Ok(canonical) => {
                    state.replace(canonical);
                    debug!(task_id = %id, "task updated");
                    Ok(state.projection())
                }
                Err(source) => {
                    warn!(task_id = %id, error = %source, "task update failed");
                    Err(BoardError::Update { task_id: id, source })
                }
            }
        };
        drop(marker);
        outcome
    }

    /// Deletes tasks remotely and drops them from the cache.
    ///
    /// Epic links are not checked here; callers apply the association guard
    /// beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MutationInFlight`] when any task has a change in
    /// progress and [`BoardError::Delete`] when persistence fails; the cache
    /// is left unchanged.
    pub async fn remove_many(&self, ids: &[TaskId]) -> BoardResult<TasksByStep> {
        {
            let state = self.read_state()?;
            for id in ids {
                state.ensure_idle(*id)?;
            }
        }

        if let Err(err) = self.repository.delete_many(ids.to_vec()).await {
            warn!(count = ids.len(), error = %err, "task deletion failed");
            return Err(BoardError::Delete(err));
        }

        let mut state = self.write_state()?;
        state.tasks.retain(|task| !ids.contains(&task.id()));
        info!(count = ids.len(), "tasks deleted");
        Ok(state.projection())
    }

    /// Applies a drag-end event as a step move.
    ///
    /// The cached task is moved to the target column before the remote call.
    /// If the call fails the task returns to the column captured before the
    /// move. Dropping outside any column, or onto the current column, is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotCached`] for unknown tasks,
    /// [`BoardError::MutationInFlight`] when the task already has a change in
    /// progress, and [`BoardError::Move`] after rolling back a failed move.
    pub async fn on_drag_end(&self, event: DragEndEvent) -> BoardResult<TasksByStep> {
        let Some(target) = event.over else {
            debug!(task_id = %event.active, "task dropped outside the board");
            return self.snapshot();
        };
        let task_id = event.active;

        let previous_step = {
            let mut state = self.write_state()?;
            state.ensure_idle(task_id)?;
            let task = state
                .task_mut(task_id)
                .ok_or(BoardError::NotCached(task_id))?;
            let previous_step = task.step_id();
            if previous_step == target {
                return Ok(state.projection());
            }
            task.place_in_step(target);
            state.pending.insert(task_id);
            previous_step
        };
        let marker = PendingMarker {
            state: Arc::clone(&self.state),
            task_id,
        };
        debug!(%task_id, from = %previous_step, to = %target, "optimistic move applied");

        let result = self.repository.move_to_step(task_id, target).await;

        let outcome = {
            let mut state = self.write_state()?;
            match result {
                Ok(canonical) => {
                    state.replace(canonical);
                    info!(%task_id, to = %target, "task moved");
                    Ok(state.projection())
                }
                Err(source) => {
                    // Only revert if the entry still shows our optimistic move;
                    // a reload in between already reflects persistence.
                    if let Some(task) = state.task_mut(task_id)
                        && task.step_id() == target
                    {
                        task.place_in_step(previous_step);
                    }
                    warn!(%task_id, to = %target, error = %source, "move failed; rolled back");
                    Err(BoardError::Move { task_id, source })
                }
            }
        };
        drop(marker);
        outcome
    }

    fn mark_pending(&self, task_id: TaskId) -> BoardResult<PendingMarker> {
        let mut state = self.write_state()?;
        state.ensure_idle(task_id)?;
        state.pending.insert(task_id);
        Ok(PendingMarker {
            state: Arc::clone(&self.state),
            task_id,
        })
    }

    fn read_state(&self) -> BoardResult<RwLockReadGuard<'_, BoardState>> {
        self.state
            .read()
            .map_err(|err| BoardError::CacheUnavailable(err.to_string()))
    }

    fn write_state(&self) -> BoardResult<RwLockWriteGuard<'_, BoardState>> {
        self.state
            .write()
            .map_err(|err| BoardError::CacheUnavailable(err.to_string()))
    }
}
