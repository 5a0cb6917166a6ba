//! Service layer for sprint planning, activation, and closing.

use super::migrator::{
    MigrationError, MigrationTargetError, SprintCloseMigrator, eligible_destinations,
    validate_migration_target,
};
use crate::sprint::{
    domain::{
        NewSprint, Sprint, SprintDomainError, SprintId, SprintMigration, SprintPatch, SprintState,
    },
    ports::{SprintRepository, SprintRepositoryError},
};
use crate::task::{domain::TaskId, ports::TaskRepository};
use crate::workspace::{
    domain::{Workspace, WorkspaceId},
    ports::{WorkspaceRepository, WorkspaceRepositoryError},
};
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for planning a new sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSprintRequest {
    workspace_id: WorkspaceId,
    name: String,
    planned_start: NaiveDate,
    planned_end: NaiveDate,
}

impl PlanSprintRequest {
    /// Creates a request with the sprint's name and planned dates.
    #[must_use]
    pub fn new(
        workspace_id: WorkspaceId,
        name: impl Into<String>,
        planned_start: NaiveDate,
        planned_end: NaiveDate,
    ) -> Self {
        Self {
            workspace_id,
            name: name.into(),
            planned_start,
            planned_end,
        }
    }
}

/// Outcome of a successful sprint close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintCloseReport {
    /// The sprint after closing.
    pub sprint: Sprint,
    /// Migration applied to pending tasks.
    pub migration: SprintMigration,
    /// Done tasks that stay with the closed sprint.
    pub kept: Vec<TaskId>,
    /// Pending tasks moved to the destination.
    pub relocated: Vec<TaskId>,
}

/// Service-level errors for sprint lifecycle operations.
#[derive(Debug, Error)]
pub enum SprintLifecycleError {
    /// Domain validation or transition rules failed.
    #[error(transparent)]
    Domain(#[from] SprintDomainError),
    /// Sprint repository operation failed.
    #[error(transparent)]
    Repository(SprintRepositoryError),
    /// Workspace lookup failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceRepositoryError),
    /// No sprint exists with the given identifier.
    #[error("sprint {0} not found")]
    NotFound(SprintId),
    /// No workspace exists with the given identifier.
    #[error("workspace {0} not found")]
    WorkspaceNotFound(WorkspaceId),
    /// The workspace runs Kanban and has no sprints.
    #[error("workspace {0} does not use sprints")]
    SprintsUnsupported(WorkspaceId),
    /// Another sprint of the workspace is already active.
    #[error("activation conflict: workspace {workspace_id} already has active sprint {active_sprint_id}")]
    ActivationConflict {
        /// Workspace holding the active sprint.
        workspace_id: WorkspaceId,
        /// Currently active sprint.
        active_sprint_id: SprintId,
    },
    /// The chosen close destination is not an open sprint of the workspace.
    #[error("invalid migration target: {0}")]
    InvalidMigrationTarget(#[from] MigrationTargetError),
    /// Relocating pending tasks failed; the sprint was left active.
    #[error(transparent)]
    Migration(#[from] MigrationError),
}

impl From<SprintRepositoryError> for SprintLifecycleError {
    fn from(err: SprintRepositoryError) -> Self {
        match err {
            SprintRepositoryError::ActiveSprintExists {
                workspace_id,
                active_sprint_id,
            } => Self::ActivationConflict {
                workspace_id,
                active_sprint_id,
            },
            SprintRepositoryError::Rejected(domain) => Self::Domain(domain),
            SprintRepositoryError::NotFound(id) => Self::NotFound(id),
            other @ SprintRepositoryError::Persistence(_) => Self::Repository(other),
        }
    }
}

/// Result type for sprint lifecycle service operations.
pub type SprintLifecycleResult<T> = Result<T, SprintLifecycleError>;

/// Sprint lifecycle orchestration service.
pub struct SprintLifecycleService<S, T, W>
where
    S: SprintRepository,
    T: TaskRepository,
    W: WorkspaceRepository,
{
    sprints: Arc<S>,
    workspaces: Arc<W>,
    migrator: SprintCloseMigrator<T>,
}

impl<S, T, W> SprintLifecycleService<S, T, W>
where
    S: SprintRepository,
    T: TaskRepository,
    W: WorkspaceRepository,
{
    /// Creates a new sprint lifecycle service.
    #[must_use]
    pub const fn new(sprints: Arc<S>, tasks: Arc<T>, workspaces: Arc<W>) -> Self {
        Self {
            sprints,
            workspaces,
            migrator: SprintCloseMigrator::new(tasks),
        }
    }

    async fn scrum_workspace(&self, workspace_id: WorkspaceId) -> SprintLifecycleResult<Workspace> {
        let workspace = self
            .workspaces
            .find_by_id(workspace_id)
            .await?
            .ok_or(SprintLifecycleError::WorkspaceNotFound(workspace_id))?;
        if !workspace.methodology().uses_sprints() {
            return Err(SprintLifecycleError::SprintsUnsupported(workspace_id));
        }
        Ok(workspace)
    }

    async fn find_sprint_or_error(&self, sprint_id: SprintId) -> SprintLifecycleResult<Sprint> {
        self.sprints
            .find_by_id(sprint_id)
            .await?
            .ok_or(SprintLifecycleError::NotFound(sprint_id))
    }

    /// Plans a new sprint in a Scrum workspace.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::SprintsUnsupported`] for Kanban
    /// workspaces, domain errors for invalid names or dates, and repository
    /// errors when persistence fails.
    pub async fn plan(&self, request: PlanSprintRequest) -> SprintLifecycleResult<Sprint> {
        let PlanSprintRequest {
            workspace_id,
            name,
            planned_start,
            planned_end,
        } = request;
        self.scrum_workspace(workspace_id).await?;
        let draft = NewSprint::new(workspace_id, name, planned_start, planned_end)?;
        let sprint = self.sprints.create(draft).await?;
        info!(sprint_id = %sprint.id(), %workspace_id, "sprint planned");
        Ok(sprint)
    }

    /// Edits a sprint's name or planned dates.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::ClosedSprintImmutable`] (as
    /// [`SprintLifecycleError::Domain`]) for closed sprints.
    pub async fn edit(
        &self,
        sprint_id: SprintId,
        patch: SprintPatch,
    ) -> SprintLifecycleResult<Sprint> {
        let sprint = self.find_sprint_or_error(sprint_id).await?;
        if sprint.state().is_terminal() {
            return Err(SprintDomainError::ClosedSprintImmutable(sprint_id).into());
        }
        Ok(self.sprints.update(sprint_id, patch).await?)
    }

    /// Activates a planning sprint.
    ///
    /// The service checks for an already active sprint before calling
    /// persistence, which enforces the same rule authoritatively.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::ActivationConflict`] when another
    /// sprint is active and [`SprintLifecycleError::Domain`] when the sprint
    /// is not in planning.
    pub async fn activate(&self, sprint_id: SprintId) -> SprintLifecycleResult<Sprint> {
        let sprint = self.find_sprint_or_error(sprint_id).await?;
        self.scrum_workspace(sprint.workspace_id()).await?;
        sprint.ensure_can_transition_to(SprintState::Active)?;

        let active = self
            .sprints
            .list(sprint.workspace_id(), Some(SprintState::Active))
            .await?;
        if let Some(other) = active.iter().find(|other| other.id() != sprint_id) {
            return Err(SprintLifecycleError::ActivationConflict {
                workspace_id: sprint.workspace_id(),
                active_sprint_id: other.id(),
            });
        }

        let activated = self.sprints.activate(sprint_id).await?;
        info!(%sprint_id, workspace_id = %activated.workspace_id(), "sprint activated");
        Ok(activated)
    }

    /// Closes an active sprint, relocating its unfinished tasks.
    ///
    /// Done tasks keep the sprint; the others move to `migration`. If any
    /// relocation or the final state change fails, relocated tasks are
    /// returned and the sprint stays active.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::Domain`] unless the sprint is active,
    /// [`SprintLifecycleError::InvalidMigrationTarget`] for a destination that
    /// is not an open sprint of the same workspace, and
    /// [`SprintLifecycleError::Migration`] when relocation or the final state
    /// change fails; [`MigrationError::CloseFailed`] lists tasks that could
    /// not be returned to the sprint.
    pub async fn close(
        &self,
        sprint_id: SprintId,
        migration: SprintMigration,
    ) -> SprintLifecycleResult<SprintCloseReport> {
        let sprint = self.find_sprint_or_error(sprint_id).await?;
        sprint.ensure_can_transition_to(SprintState::Closed)?;
        let workspace = self.scrum_workspace(sprint.workspace_id()).await?;
        self.check_destination(&sprint, migration).await?;

        let done_step = workspace.pipeline().done_step().id();
        let plan = self.migrator.plan(&sprint, done_step, migration).await?;
        self.migrator.apply(&plan).await?;

        if let Err(source) = self.sprints.close(sprint_id, migration).await {
            let unreverted = self.migrator.undo(&plan).await;
            warn!(%sprint_id, error = %source, unreverted = unreverted.len(), "sprint close failed");
            return Err(MigrationError::CloseFailed {
                sprint_id,
                source,
                unreverted,
            }
            .into());
        }

        let closed = self.find_sprint_or_error(sprint_id).await?;
        info!(
            %sprint_id,
            %migration,
            kept = plan.kept().len(),
            relocated = plan.relocated().len(),
            "sprint closed"
        );
        Ok(SprintCloseReport {
            sprint: closed,
            migration,
            kept: plan.kept().to_vec(),
            relocated: plan.relocated().to_vec(),
        })
    }

    async fn check_destination(
        &self,
        closing: &Sprint,
        migration: SprintMigration,
    ) -> SprintLifecycleResult<()> {
        let destination = match migration.destination() {
            Some(target_id) if target_id != closing.id() => {
                self.sprints.find_by_id(target_id).await?
            }
            _ => None,
        };
        validate_migration_target(closing, migration, destination.as_ref())?;
        Ok(())
    }

    /// Returns the sprints eligible as close destination for `sprint_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::NotFound`] for unknown sprints and
    /// repository errors when persistence fails.
    pub async fn migration_destinations(
        &self,
        sprint_id: SprintId,
    ) -> SprintLifecycleResult<Vec<Sprint>> {
        let closing = self.find_sprint_or_error(sprint_id).await?;
        let candidates = self.sprints.list(closing.workspace_id(), None).await?;
        Ok(eligible_destinations(&closing, &candidates))
    }

    /// Lists the sprints of a workspace, optionally filtered by state.
    ///
    /// # Errors
    ///
    /// Returns repository errors when persistence fails.
    pub async fn list(
        &self,
        workspace_id: WorkspaceId,
        state: Option<SprintState>,
    ) -> SprintLifecycleResult<Vec<Sprint>> {
        Ok(self.sprints.list(workspace_id, state).await?)
    }

    /// Returns the active sprint of a workspace, if any.
    ///
    /// # Errors
    ///
    /// Returns repository errors when persistence fails.
    pub async fn active_sprint(
        &self,
        workspace_id: WorkspaceId,
    ) -> SprintLifecycleResult<Option<Sprint>> {
        let active = self
            .sprints
            .list(workspace_id, Some(SprintState::Active))
            .await?;
        Ok(active.into_iter().next())
    }

    /// Finds a sprint by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::NotFound`] for unknown sprints.
    pub async fn find(&self, sprint_id: SprintId) -> SprintLifecycleResult<Sprint> {
        self.find_sprint_or_error(sprint_id).await
    }
}
