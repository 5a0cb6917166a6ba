//! In-memory task repository for board tests and local wiring.

use async_trait::async_trait;
use mockable::DefaultClock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{NewTask, Task, TaskId, TaskPatch},
    ports::{TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::workspace::domain::StepId;

/// Repository operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskOperation {
    /// [`TaskRepository::list`].
    List,
    /// [`TaskRepository::get`].
    Get,
    /// [`TaskRepository::create`].
    Create,
    /// [`TaskRepository::update`].
    Update,
    /// [`TaskRepository::delete_many`].
    DeleteMany,
    /// [`TaskRepository::move_to_step`].
    MoveToStep,
}

/// Thread-safe in-memory task repository.
///
/// Tasks are kept in creation order. Failures can be injected per operation
/// to simulate transport errors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: Vec<Task>,
    failures: HashMap<TaskOperation, usize>,
}

impl InMemoryTaskState {
    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == id)
    }

    fn task_mut(&mut self, id: TaskId) -> TaskRepositoryResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    /// Consumes one armed failure for `operation`, if its countdown expired.
    fn take_failure(&mut self, operation: TaskOperation) -> TaskRepositoryResult<()> {
        let Some(remaining) = self.failures.get_mut(&operation) else {
            return Ok(());
        };
        if *remaining > 0 {
            *remaining -= 1;
            return Ok(());
        }
        self.failures.remove(&operation);
        Err(TaskRepositoryError::persistence(std::io::Error::other(
            format!("injected {operation:?} failure"),
        )))
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call of `operation` fail.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is poisoned.
    pub fn fail_next(&self, operation: TaskOperation) -> TaskRepositoryResult<()> {
        self.fail_after(operation, 0)
    }

    /// Lets `successes` calls of `operation` through, then fails the next one.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is poisoned.
    pub fn fail_after(&self, operation: TaskOperation, successes: usize) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        state.failures.insert(operation, successes);
        Ok(())
    }

    /// Returns every stored task in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is poisoned.
    pub fn all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.clone())
    }

    fn write_state(&self) -> TaskRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list(&self, query: TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let mut state = self.write_state()?;
        state.take_failure(TaskOperation::List)?;
        Ok(state
            .tasks
            .iter()
            .filter(|task| query.matches(task))
            .cloned()
            .collect())
    }

    async fn get(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        let mut state = self.write_state()?;
        state.take_failure(TaskOperation::Get)?;
        state.task_mut(id).map(|task| task.clone())
    }

    async fn create(&self, draft: NewTask) -> TaskRepositoryResult<Task> {
        let mut state = self.write_state()?;
        state.take_failure(TaskOperation::Create)?;
        let task = Task::create(TaskId::new(), draft, &DefaultClock);
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> TaskRepositoryResult<Task> {
        let mut state = self.write_state()?;
        state.take_failure(TaskOperation::Update)?;
        let task = state.task_mut(id)?;
        task.apply(patch, &DefaultClock)
            .map_err(|err| TaskRepositoryError::Rejected {
                task_id: id,
                reason: err.to_string(),
            })?;
        Ok(task.clone())
    }

    async fn delete_many(&self, ids: Vec<TaskId>) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        state.take_failure(TaskOperation::DeleteMany)?;
        if let Some(missing) = ids.iter().find(|id| state.position(**id).is_none()) {
            return Err(TaskRepositoryError::NotFound(*missing));
        }
        state.tasks.retain(|task| !ids.contains(&task.id()));
        Ok(())
    }

    async fn move_to_step(&self, id: TaskId, step_id: StepId) -> TaskRepositoryResult<Task> {
        let mut state = self.write_state()?;
        state.take_failure(TaskOperation::MoveToStep)?;
        let task = state.task_mut(id)?;
        task.move_to_step(step_id, &DefaultClock);
        Ok(task.clone())
    }
}
