//! Board session facade composing the board cache and sprint lifecycle.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use super::BoardView;
use crate::config::{BoardConfig, CloseTarget};
use crate::epic::{domain::EpicGuardError, services::EpicAssociationGuard};
use crate::session::{
    domain::{Notice, SessionPreferences, UserId},
    ports::{Notifier, PreferenceStore, PreferenceStoreError},
};
use crate::sprint::{
    domain::{Sprint, SprintId, SprintMigration},
    ports::SprintRepository,
    services::{PlanSprintRequest, SprintCloseReport, SprintLifecycleError, SprintLifecycleService},
};
use crate::task::{
    domain::{NewTask, TaskDomainError, TaskId, TaskPatch},
    ports::{SprintScope, TaskRepository},
    services::{BoardError, BoardTaskStore, DragEndEvent},
};
use crate::workspace::{
    domain::{StepId, Workspace, WorkspaceId},
    ports::{WorkspaceRepository, WorkspaceRepositoryError},
};

/// Errors returned by board session operations.
#[derive(Debug, Error)]
pub enum BoardSessionError {
    /// No workspace has been opened yet.
    #[error("no workspace is open")]
    NoWorkspaceOpen,

    /// Resuming found no remembered workspace.
    #[error("no previous board to resume")]
    NothingToResume,

    /// The workspace does not exist.
    #[error("workspace {0} not found")]
    WorkspaceNotFound(WorkspaceId),

    /// The open workspace runs Kanban.
    #[error("workspace {0} does not use sprints")]
    SprintsUnsupported(WorkspaceId),

    /// The target step is not a column of the open workspace.
    #[error("step {step_id} is not part of workspace {workspace_id}")]
    UnknownStep {
        /// Requested step.
        step_id: StepId,
        /// Open workspace.
        workspace_id: WorkspaceId,
    },

    /// A task payload targets another workspace.
    #[error("task belongs to workspace {found}, but workspace {expected} is open")]
    WorkspaceMismatch {
        /// Open workspace.
        expected: WorkspaceId,
        /// Workspace named by the payload.
        found: WorkspaceId,
    },

    /// The sprint belongs to another workspace.
    #[error("sprint {sprint_id} is not part of workspace {workspace_id}")]
    SprintOutsideWorkspace {
        /// Requested sprint.
        sprint_id: SprintId,
        /// Open workspace.
        workspace_id: WorkspaceId,
    },

    /// Deletion refused while an epic link exists.
    #[error(transparent)]
    BlockedByAssociation(#[from] EpicGuardError),

    /// Task payload validation failed.
    #[error(transparent)]
    Task(#[from] TaskDomainError),

    /// Board cache operation failed.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// Sprint lifecycle operation failed.
    #[error(transparent)]
    Sprint(#[from] SprintLifecycleError),

    /// Workspace lookup failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceRepositoryError),

    /// Loading remembered preferences failed.
    #[error(transparent)]
    Preferences(#[from] PreferenceStoreError),
}

/// Result type for board session operations.
pub type BoardSessionResult<T> = Result<T, BoardSessionError>;

/// Collaborators injected into a [`BoardSession`].
pub struct BoardSessionPorts<T, S, W> {
    /// Task persistence.
    pub tasks: Arc<T>,
    /// Sprint persistence.
    pub sprints: Arc<S>,
    /// Workspace configuration.
    pub workspaces: Arc<W>,
    /// Remembered selections.
    pub preferences: Arc<dyn PreferenceStore>,
    /// Notice sink.
    pub notifier: Arc<dyn Notifier>,
}

/// A committed sprint transition and the board reloaded after it.
#[derive(Debug)]
pub struct SprintTransition<T> {
    /// What the transition produced.
    pub outcome: T,
    /// The reloaded board. An error here leaves the transition in place.
    pub view: BoardSessionResult<BoardView>,
}

/// One user's interactive view of a workspace board.
///
/// Every mutating operation reports its outcome through the [`Notifier`];
/// success notices can be switched off through [`BoardConfig`].
pub struct BoardSession<T, S, W>
where
    T: TaskRepository,
    S: SprintRepository,
    W: WorkspaceRepository,
{
    user: UserId,
    config: BoardConfig,
    workspaces: Arc<W>,
    store: BoardTaskStore<T>,
    sprints: SprintLifecycleService<S, T, W>,
    preferences: Arc<dyn PreferenceStore>,
    notifier: Arc<dyn Notifier>,
    workspace: Option<Workspace>,
}

impl<T, S, W> BoardSession<T, S, W>
where
    T: TaskRepository,
    S: SprintRepository,
    W: WorkspaceRepository,
{
    /// Creates a session for `user` with no workspace open.
    #[must_use]
    pub fn new(user: UserId, config: BoardConfig, ports: BoardSessionPorts<T, S, W>) -> Self {
        let BoardSessionPorts {
            tasks,
            sprints,
            workspaces,
            preferences,
            notifier,
        } = ports;
        Self {
            user,
            config,
            store: BoardTaskStore::new(Arc::clone(&tasks)),
            sprints: SprintLifecycleService::new(sprints, tasks, Arc::clone(&workspaces)),
            workspaces,
            preferences,
            notifier,
            workspace: None,
        }
    }

    /// Returns the board cache.
    #[must_use]
    pub const fn store(&self) -> &BoardTaskStore<T> {
        &self.store
    }

    /// Returns the sprint lifecycle service.
    #[must_use]
    pub const fn sprints(&self) -> &SprintLifecycleService<S, T, W> {
        &self.sprints
    }

    /// Returns the open workspace, if any.
    #[must_use]
    pub const fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    /// Opens a workspace board.
    ///
    /// Kanban boards show every task. Scrum boards show the active sprint, or
    /// the backlog when no sprint is active.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::WorkspaceNotFound`] for unknown
    /// workspaces and [`BoardSessionError::Board`] when tasks cannot be
    /// loaded; the previously open board stays in place.
    pub async fn open_workspace(
        &mut self,
        workspace_id: WorkspaceId,
    ) -> BoardSessionResult<BoardView> {
        let result = self.enter_workspace(workspace_id, None).await;
        self.report(result, |view| {
            format!("Board loaded with {} tasks", view.task_count())
        })
    }

    /// Reopens the workspace and sprint remembered for this user.
    ///
    /// A remembered sprint that no longer exists falls back to the default
    /// view of the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::NothingToResume`] when nothing was
    /// remembered.
    pub async fn resume(&mut self) -> BoardSessionResult<BoardView> {
        let remembered = self.preferences.load(self.user).await;
        let result = match remembered {
            Ok(SessionPreferences {
                workspace: Some(workspace_id),
                sprint,
            }) => self.enter_workspace(workspace_id, sprint).await,
            Ok(_) => Err(BoardSessionError::NothingToResume),
            Err(err) => Err(err.into()),
        };
        self.report(result, |view| {
            format!("Board restored with {} tasks", view.task_count())
        })
    }

    /// Shows the backlog of the open Scrum workspace.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::SprintsUnsupported`] for Kanban
    /// workspaces.
    pub async fn open_backlog(&self) -> BoardSessionResult<BoardView> {
        let result = async {
            let workspace = self.scrum_workspace()?;
            self.load_scope(workspace, SprintScope::Backlog).await
        }
        .await;
        self.report(result, |_| "Showing backlog".to_owned())
    }

    /// Shows one sprint of the open Scrum workspace.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::SprintOutsideWorkspace`] when the sprint
    /// belongs to another workspace.
    pub async fn open_sprint(&self, sprint_id: SprintId) -> BoardSessionResult<BoardView> {
        let result = async {
            let workspace = self.scrum_workspace()?;
            let sprint = self.sprint_in_workspace(workspace, sprint_id).await?;
            let view = self
                .load_scope(workspace, SprintScope::Sprint(sprint_id))
                .await?;
            Ok::<_, BoardSessionError>((sprint, view))
        }
        .await;
        self.report(result, |(sprint, _)| format!("Showing sprint {}", sprint.name()))
            .map(|(_, view)| view)
    }

    /// Returns the current board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::NoWorkspaceOpen`] before a workspace is
    /// opened.
    pub fn board(&self) -> BoardSessionResult<BoardView> {
        let workspace = self.current_workspace()?;
        let scope = self
            .store
            .scope()?
            .map_or(SprintScope::Unscoped, |loaded| loaded.sprint);
        let projection = self.store.snapshot()?;
        Ok(BoardView::build(
            workspace.id(),
            workspace.pipeline(),
            scope,
            &projection,
        ))
    }

    /// Prepares a task payload in the entry column of the current view.
    ///
    /// Tasks drafted while a sprint is shown belong to that sprint.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::Task`] for a blank title.
    pub fn draft_task(&self, title: impl Into<String>) -> BoardSessionResult<NewTask> {
        let workspace = self.current_workspace()?;
        let draft = NewTask::new(
            workspace.id(),
            workspace.pipeline().entry_step().id(),
            title,
        )?;
        Ok(match self.store.scope()?.map(|loaded| loaded.sprint) {
            Some(SprintScope::Sprint(sprint_id)) => draft.in_sprint(sprint_id),
            _ => draft,
        })
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::UnknownStep`] when the payload's step is
    /// not a column of the open workspace.
    pub async fn create_task(&self, draft: NewTask) -> BoardSessionResult<BoardView> {
        let title = draft.title().to_owned();
        let result = async {
            let workspace = self.current_workspace()?;
            if draft.workspace_id() != workspace.id() {
                return Err(BoardSessionError::WorkspaceMismatch {
                    expected: workspace.id(),
                    found: draft.workspace_id(),
                });
            }
            ensure_step(workspace, draft.step_id())?;
            self.store.create(draft).await?;
            self.board()
        }
        .await;
        self.report(result, |_| format!("Task \"{title}\" created"))
    }

    /// Updates a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::UnknownStep`] when the patch moves the
    /// task outside the pipeline.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> BoardSessionResult<BoardView> {
        let result = async {
            let workspace = self.current_workspace()?;
            if let Some(step_id) = patch.target_step() {
                ensure_step(workspace, step_id)?;
            }
            self.store.update(task_id, patch).await?;
            self.board()
        }
        .await;
        self.report(result, |_| "Task updated".to_owned())
    }

    /// Deletes tasks after checking none is linked to an epic.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::BlockedByAssociation`] without deleting
    /// anything when any task has an epic.
    pub async fn remove_tasks(&self, task_ids: &[TaskId]) -> BoardSessionResult<BoardView> {
        let result = async {
            self.current_workspace()?;
            let mut tasks = Vec::with_capacity(task_ids.len());
            for task_id in task_ids {
                let task = self
                    .store
                    .cached(*task_id)?
                    .ok_or(BoardError::NotCached(*task_id))?;
                tasks.push(task);
            }
            EpicAssociationGuard::ensure_tasks_deletable(&tasks)?;
            self.store.remove_many(task_ids).await?;
            self.board()
        }
        .await;
        self.report(result, |_| match task_ids.len() {
            1 => "Task deleted".to_owned(),
            count => format!("{count} tasks deleted"),
        })
    }

    /// Applies a drag-and-drop move.
    ///
    /// Drops outside the board or onto the task's own column change nothing
    /// and emit no notice.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::UnknownStep`] for drops on a column that
    /// is not in the pipeline and [`BoardSessionError::Board`] after a failed
    /// move was rolled back.
    pub async fn on_drag_end(&self, event: DragEndEvent) -> BoardSessionResult<BoardView> {
        let workspace = self.current_workspace()?;
        let Some(target) = event.over else {
            return self.board();
        };
        let current = self.store.cached(event.active)?.map(|task| task.step_id());
        if current == Some(target) {
            return self.board();
        }
        let result = async {
            ensure_step(workspace, target)?;
            self.store.on_drag_end(event).await?;
            self.board()
        }
        .await;
        let column = workspace
            .pipeline()
            .step(target)
            .map_or_else(String::new, |step| step.name().to_owned());
        self.report(result, |_| format!("Task moved to {column}"))
    }

    /// Plans a sprint in the open workspace.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::SprintsUnsupported`] for Kanban
    /// workspaces and [`BoardSessionError::Sprint`] for invalid input.
    pub async fn plan_sprint(
        &self,
        name: impl Into<String>,
        planned_start: NaiveDate,
        planned_end: NaiveDate,
    ) -> BoardSessionResult<Sprint> {
        let request = self.scrum_workspace().map(|workspace| {
            PlanSprintRequest::new(workspace.id(), name, planned_start, planned_end)
        });
        let result = match request {
            Ok(request) => self.sprints.plan(request).await.map_err(Into::into),
            Err(err) => Err(err),
        };
        self.report(result, |sprint| format!("Sprint {} planned", sprint.name()))
    }

    /// Starts a sprint and switches the board to it.
    ///
    /// The activation is reported as soon as persistence accepts it; a board
    /// reload failing afterwards is returned in [`SprintTransition::view`]
    /// and notified on its own.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::Sprint`] wrapping
    /// [`SprintLifecycleError::ActivationConflict`] when another sprint is
    /// active.
    pub async fn activate_sprint(
        &self,
        sprint_id: SprintId,
    ) -> BoardSessionResult<SprintTransition<Sprint>> {
        let result = async {
            let workspace = self.scrum_workspace()?;
            self.sprint_in_workspace(workspace, sprint_id).await?;
            let sprint = self.sprints.activate(sprint_id).await?;
            Ok::<_, BoardSessionError>((workspace, sprint))
        }
        .await;
        let (workspace, sprint) =
            self.report(result, |(_, sprint)| format!("Sprint {} started", sprint.name()))?;
        let view = self
            .reload_after_transition(workspace, SprintScope::Sprint(sprint_id))
            .await;
        Ok(SprintTransition {
            outcome: sprint,
            view,
        })
    }

    /// Closes a sprint and switches the board to the backlog.
    ///
    /// Once the sprint is closed the close is reported as done; a board
    /// reload failing afterwards is returned in [`SprintTransition::view`]
    /// and notified on its own.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::Sprint`] when the close is refused or
    /// the migration fails; the sprint then stays active and its tasks keep
    /// their sprint.
    pub async fn close_sprint(
        &self,
        sprint_id: SprintId,
        migration: SprintMigration,
    ) -> BoardSessionResult<SprintTransition<SprintCloseReport>> {
        let result = async {
            let workspace = self.scrum_workspace()?;
            self.sprint_in_workspace(workspace, sprint_id).await?;
            let report = self.sprints.close(sprint_id, migration).await?;
            Ok::<_, BoardSessionError>((workspace, report))
        }
        .await;
        let (workspace, report) = self.report(result, |(_, report)| {
            format!(
                "Sprint {} closed; {} unfinished tasks moved to {}",
                report.sprint.name(),
                report.relocated.len(),
                report.migration
            )
        })?;
        let view = self
            .reload_after_transition(workspace, SprintScope::Backlog)
            .await;
        Ok(SprintTransition {
            outcome: report,
            view,
        })
    }

    /// Returns the sprints a closing sprint may hand its tasks to.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::Sprint`] for unknown sprints.
    pub async fn migration_destinations(
        &self,
        sprint_id: SprintId,
    ) -> BoardSessionResult<Vec<Sprint>> {
        Ok(self.sprints.migration_destinations(sprint_id).await?)
    }

    /// Returns the migration preselected when closing `sprint_id`.
    ///
    /// With [`CloseTarget::NextSprint`] this is the eligible sprint starting
    /// first, or the backlog when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSessionError::Sprint`] for unknown sprints.
    pub async fn default_migration(
        &self,
        sprint_id: SprintId,
    ) -> BoardSessionResult<SprintMigration> {
        match self.config.default_close_target() {
            CloseTarget::Backlog => Ok(SprintMigration::Backlog),
            CloseTarget::NextSprint => {
                let destinations = self.migration_destinations(sprint_id).await?;
                Ok(destinations
                    .iter()
                    .min_by_key(|sprint| sprint.planned_start())
                    .map_or(SprintMigration::Backlog, |sprint| {
                        SprintMigration::to_sprint(sprint.id())
                    }))
            }
        }
    }

    async fn enter_workspace(
        &mut self,
        workspace_id: WorkspaceId,
        preferred_sprint: Option<SprintId>,
    ) -> BoardSessionResult<BoardView> {
        let workspace = self
            .workspaces
            .find_by_id(workspace_id)
            .await?
            .ok_or(BoardSessionError::WorkspaceNotFound(workspace_id))?;
        let scope = self.initial_scope(&workspace, preferred_sprint).await?;
        let view = self.load_scope(&workspace, scope).await?;
        self.workspace = Some(workspace);
        Ok(view)
    }

    async fn initial_scope(
        &self,
        workspace: &Workspace,
        preferred_sprint: Option<SprintId>,
    ) -> BoardSessionResult<SprintScope> {
        if !workspace.methodology().uses_sprints() {
            return Ok(SprintScope::Unscoped);
        }
        if let Some(sprint_id) = preferred_sprint {
            match self.sprints.find(sprint_id).await {
                Ok(sprint) if sprint.workspace_id() == workspace.id() => {
                    return Ok(SprintScope::Sprint(sprint_id));
                }
                Ok(_) | Err(SprintLifecycleError::NotFound(_)) => {
                    warn!(%sprint_id, "remembered sprint unavailable; using default view");
                }
                Err(err) => return Err(err.into()),
            }
        }
        let active = self.sprints.active_sprint(workspace.id()).await?;
        Ok(active.map_or(SprintScope::Backlog, |sprint| {
            SprintScope::Sprint(sprint.id())
        }))
    }

    async fn load_scope(
        &self,
        workspace: &Workspace,
        scope: SprintScope,
    ) -> BoardSessionResult<BoardView> {
        let projection = self.store.load_by_workspace(workspace.id(), scope).await?;
        self.remember(workspace.id(), scope).await;
        Ok(BoardView::build(
            workspace.id(),
            workspace.pipeline(),
            scope,
            &projection,
        ))
    }

    async fn reload_after_transition(
        &self,
        workspace: &Workspace,
        scope: SprintScope,
    ) -> BoardSessionResult<BoardView> {
        let view = self.load_scope(workspace, scope).await;
        if let Err(err) = &view {
            warn!(workspace_id = %workspace.id(), error = %err, "board reload after sprint change failed");
            self.notify_failure(err);
        }
        view
    }

    async fn remember(&self, workspace_id: WorkspaceId, scope: SprintScope) {
        let sprint = match scope {
            SprintScope::Sprint(sprint_id) => Some(sprint_id),
            SprintScope::Backlog | SprintScope::Unscoped => None,
        };
        let preferences = SessionPreferences::new(workspace_id, sprint);
        if let Err(err) = self.preferences.save(self.user, preferences).await {
            warn!(user = %self.user, error = %err, "failed to remember board selection");
        }
    }

    async fn sprint_in_workspace(
        &self,
        workspace: &Workspace,
        sprint_id: SprintId,
    ) -> BoardSessionResult<Sprint> {
        let sprint = self.sprints.find(sprint_id).await?;
        if sprint.workspace_id() != workspace.id() {
            return Err(BoardSessionError::SprintOutsideWorkspace {
                sprint_id,
                workspace_id: workspace.id(),
            });
        }
        Ok(sprint)
    }

    fn current_workspace(&self) -> BoardSessionResult<&Workspace> {
        self.workspace
            .as_ref()
            .ok_or(BoardSessionError::NoWorkspaceOpen)
    }

    fn scrum_workspace(&self) -> BoardSessionResult<&Workspace> {
        let workspace = self.current_workspace()?;
        if !workspace.methodology().uses_sprints() {
            return Err(BoardSessionError::SprintsUnsupported(workspace.id()));
        }
        Ok(workspace)
    }

    fn report<V>(
        &self,
        result: BoardSessionResult<V>,
        describe: impl FnOnce(&V) -> String,
    ) -> BoardSessionResult<V> {
        match &result {
            Ok(value) if self.config.notify_success() => {
                self.notifier.notify(Notice::success(describe(value)));
            }
            Ok(_) => debug!("success notice suppressed"),
            Err(err) => self.notify_failure(err),
        }
        result
    }

    /// Notifies an error, except for loads that lost to a newer request.
    fn notify_failure(&self, err: &BoardSessionError) {
        if let BoardSessionError::Board(BoardError::Superseded { workspace_id }) = err {
            debug!(%workspace_id, "superseded board load; no notice");
            return;
        }
        self.notifier.notify(Notice::error(err.to_string()));
    }
}

fn ensure_step(workspace: &Workspace, step_id: StepId) -> BoardSessionResult<()> {
    if workspace.pipeline().contains(step_id) {
        return Ok(());
    }
    Err(BoardSessionError::UnknownStep {
        step_id,
        workspace_id: workspace.id(),
    })
}
