//! Relocation of unfinished tasks when a sprint closes.

use crate::sprint::{
    domain::{Sprint, SprintId, SprintMigration},
    ports::SprintRepositoryError,
};
use crate::task::{
    domain::{Task, TaskId, TaskPatch},
    ports::{SprintScope, TaskQuery, TaskRepository, TaskRepositoryError},
};
use crate::workspace::domain::{StepId, WorkspaceId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Why a migration destination was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MigrationTargetError {
    /// The destination is the sprint being closed.
    #[error("cannot migrate sprint {0} into itself")]
    SameSprint(SprintId),

    /// The destination sprint does not exist.
    #[error("destination sprint {0} does not exist")]
    UnknownSprint(SprintId),

    /// The destination belongs to another workspace.
    #[error("destination sprint {sprint_id} belongs to workspace {found}, expected {expected}")]
    OtherWorkspace {
        /// Destination sprint.
        sprint_id: SprintId,
        /// Workspace of the closing sprint.
        expected: WorkspaceId,
        /// Workspace of the destination.
        found: WorkspaceId,
    },

    /// The destination is already closed.
    #[error("destination sprint {0} is closed")]
    ClosedSprint(SprintId),
}

/// Failures while relocating tasks.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The closing sprint's tasks could not be listed.
    #[error("failed to list tasks of sprint {sprint_id}: {source}")]
    Listing {
        /// Sprint being closed.
        sprint_id: SprintId,
        /// Underlying persistence failure.
        source: TaskRepositoryError,
    },

    /// A task could not be relocated; earlier relocations were reverted.
    #[error("failed to relocate task {task_id}: {source}")]
    Relocation {
        /// Task whose relocation failed.
        task_id: TaskId,
        /// Underlying persistence failure.
        source: TaskRepositoryError,
        /// Tasks that could not be returned to the closing sprint.
        unreverted: Vec<TaskId>,
    },

    /// Tasks were relocated but the sprint could not be marked closed.
    ///
    /// Relocated tasks were sent back; `unreverted` lists those still
    /// outside the sprint, which stays active.
    #[error(
        "failed to close sprint {sprint_id}: {source}; {} task(s) could not be returned",
        .unreverted.len()
    )]
    CloseFailed {
        /// Sprint that stays active.
        sprint_id: SprintId,
        /// Underlying persistence failure.
        source: SprintRepositoryError,
        /// Tasks that could not be returned to the sprint.
        unreverted: Vec<TaskId>,
    },
}

/// Partition of a closing sprint's tasks by pipeline position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    sprint_id: SprintId,
    migration: SprintMigration,
    kept: Vec<TaskId>,
    relocated: Vec<TaskId>,
}

impl MigrationPlan {
    /// Splits `tasks` into done tasks, which stay with the sprint, and
    /// pending tasks, which move to the migration destination.
    ///
    /// Tasks not belonging to `sprint_id` are ignored.
    #[must_use]
    pub fn partition(
        sprint_id: SprintId,
        tasks: &[Task],
        done_step: StepId,
        migration: SprintMigration,
    ) -> Self {
        let (kept, relocated): (Vec<&Task>, Vec<&Task>) = tasks
            .iter()
            .filter(|task| task.sprint_id() == Some(sprint_id))
            .partition(|task| task.step_id() == done_step);
        Self {
            sprint_id,
            migration,
            kept: kept.into_iter().map(Task::id).collect(),
            relocated: relocated.into_iter().map(Task::id).collect(),
        }
    }

    /// Returns the sprint being closed.
    #[must_use]
    pub const fn sprint_id(&self) -> SprintId {
        self.sprint_id
    }

    /// Returns the migration applied to pending tasks.
    #[must_use]
    pub const fn migration(&self) -> SprintMigration {
        self.migration
    }

    /// Returns done tasks that keep the closing sprint.
    #[must_use]
    pub fn kept(&self) -> &[TaskId] {
        &self.kept
    }

    /// Returns pending tasks that move to the destination.
    #[must_use]
    pub fn relocated(&self) -> &[TaskId] {
        &self.relocated
    }
}

/// Checks a migration destination against the sprint being closed.
///
/// `destination` is the looked-up destination sprint, or `None` when the
/// lookup found nothing.
///
/// # Errors
///
/// Returns [`MigrationTargetError`] when the destination is the closing
/// sprint, unknown, in another workspace, or closed.
pub fn validate_migration_target(
    closing: &Sprint,
    migration: SprintMigration,
    destination: Option<&Sprint>,
) -> Result<(), MigrationTargetError> {
    let Some(target_id) = migration.destination() else {
        return Ok(());
    };
    if target_id == closing.id() {
        return Err(MigrationTargetError::SameSprint(target_id));
    }
    let target = destination
        .filter(|sprint| sprint.id() == target_id)
        .ok_or(MigrationTargetError::UnknownSprint(target_id))?;
    if target.workspace_id() != closing.workspace_id() {
        return Err(MigrationTargetError::OtherWorkspace {
            sprint_id: target_id,
            expected: closing.workspace_id(),
            found: target.workspace_id(),
        });
    }
    if !target.state().is_open() {
        return Err(MigrationTargetError::ClosedSprint(target_id));
    }
    Ok(())
}

/// Returns the sprints an operator may pick as close destination: open
/// sprints of the same workspace, excluding the closing sprint.
#[must_use]
pub fn eligible_destinations<'a>(
    closing: &Sprint,
    candidates: impl IntoIterator<Item = &'a Sprint>,
) -> Vec<Sprint> {
    candidates
        .into_iter()
        .filter(|sprint| {
            sprint.id() != closing.id()
                && sprint.workspace_id() == closing.workspace_id()
                && sprint.state().is_open()
        })
        .cloned()
        .collect()
}

/// Applies migration plans through task persistence.
pub struct SprintCloseMigrator<T>
where
    T: TaskRepository,
{
    tasks: Arc<T>,
}

impl<T> SprintCloseMigrator<T>
where
    T: TaskRepository,
{
    /// Creates a migrator writing through `tasks`.
    #[must_use]
    pub const fn new(tasks: Arc<T>) -> Self {
        Self { tasks }
    }

    /// Lists the sprint's tasks and partitions them.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Listing`] when tasks cannot be listed.
    pub async fn plan(
        &self,
        sprint: &Sprint,
        done_step: StepId,
        migration: SprintMigration,
    ) -> Result<MigrationPlan, MigrationError> {
        let query =
            TaskQuery::workspace(sprint.workspace_id()).in_scope(SprintScope::Sprint(sprint.id()));
        let tasks = self
            .tasks
            .list(query)
            .await
            .map_err(|source| MigrationError::Listing {
                sprint_id: sprint.id(),
                source,
            })?;
        let plan = MigrationPlan::partition(sprint.id(), &tasks, done_step, migration);
        debug!(
            sprint_id = %sprint.id(),
            kept = plan.kept().len(),
            relocated = plan.relocated().len(),
            "sprint close planned"
        );
        Ok(plan)
    }

    /// Moves every pending task to the destination.
    ///
    /// Relocation is all-or-nothing: when one task fails, tasks relocated so
    /// far are returned to the closing sprint before the error is reported.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Relocation`] for the first failing task.
    pub async fn apply(&self, plan: &MigrationPlan) -> Result<(), MigrationError> {
        let destination = plan.migration().destination();
        for (done, task_id) in plan.relocated().iter().enumerate() {
            let patch = TaskPatch::new().with_sprint(destination);
            if let Err(source) = self.tasks.update(*task_id, patch).await {
                warn!(%task_id, error = %source, "relocation failed; reverting sprint close");
                let applied = plan.relocated().get(..done).unwrap_or_default();
                let unreverted = self.revert(plan.sprint_id(), applied).await;
                return Err(MigrationError::Relocation {
                    task_id: *task_id,
                    source,
                    unreverted,
                });
            }
        }
        Ok(())
    }

    /// Returns the plan's relocated tasks to the closing sprint.
    ///
    /// Returns the tasks that could not be reverted.
    pub async fn undo(&self, plan: &MigrationPlan) -> Vec<TaskId> {
        self.revert(plan.sprint_id(), plan.relocated()).await
    }

    async fn revert(&self, sprint_id: SprintId, task_ids: &[TaskId]) -> Vec<TaskId> {
        let mut unreverted = Vec::new();
        for task_id in task_ids.iter().rev() {
            let patch = TaskPatch::new().with_sprint(Some(sprint_id));
            if let Err(err) = self.tasks.update(*task_id, patch).await {
                error!(%task_id, %sprint_id, error = %err, "could not return task to sprint");
                unreverted.push(*task_id);
            }
        }
        unreverted
    }
}
