//! Shared world state for sprint close BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use rstest::fixture;
use sprintboard::sprint::{
    adapters::memory::InMemorySprintRepository,
    domain::Sprint,
    services::{SprintCloseReport, SprintLifecycleError, SprintLifecycleService},
};
use sprintboard::task::{adapters::memory::InMemoryTaskRepository, domain::Task};
use sprintboard::workspace::{adapters::memory::InMemoryWorkspaceRepository, domain::Workspace};

/// Service type used by the BDD world.
pub type TestSprintService = SprintLifecycleService<
    InMemorySprintRepository,
    InMemoryTaskRepository,
    InMemoryWorkspaceRepository,
>;

/// Scenario world for sprint close behaviour tests.
pub struct SprintCloseWorld {
    pub service: TestSprintService,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub workspaces: Arc<InMemoryWorkspaceRepository>,
    pub workspace: Option<Workspace>,
    pub sprints: HashMap<String, Sprint>,
    pub closing: Option<Sprint>,
    pub last_close_result: Option<Result<SprintCloseReport, SprintLifecycleError>>,
}

impl SprintCloseWorld {
    /// Creates a world with empty repositories.
    #[must_use]
    pub fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let workspaces = Arc::new(InMemoryWorkspaceRepository::new());
        let service = SprintLifecycleService::new(
            Arc::new(InMemorySprintRepository::new()),
            Arc::clone(&tasks),
            Arc::clone(&workspaces),
        );

        Self {
            service,
            tasks,
            workspaces,
            workspace: None,
            sprints: HashMap::new(),
            closing: None,
            last_close_result: None,
        }
    }

    /// Returns the scenario workspace.
    ///
    /// # Errors
    ///
    /// Returns an error when no workspace was set up.
    pub fn workspace(&self) -> Result<&Workspace, eyre::Report> {
        self.workspace
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing workspace in scenario world"))
    }

    /// Returns the sprint being closed.
    ///
    /// # Errors
    ///
    /// Returns an error when no sprint was activated.
    pub fn closing(&self) -> Result<&Sprint, eyre::Report> {
        self.closing
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing active sprint in scenario world"))
    }

    /// Looks up a sprint by the name used in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error for names no step introduced.
    pub fn sprint_named(&self, name: &str) -> Result<&Sprint, eyre::Report> {
        self.sprints
            .get(name)
            .ok_or_else(|| eyre::eyre!("unknown sprint {name:?} in scenario"))
    }

    /// Looks up a stored task by title.
    ///
    /// # Errors
    ///
    /// Returns an error when no stored task has the title.
    pub fn task_titled(&self, title: &str) -> Result<Task, eyre::Report> {
        self.tasks
            .all()?
            .into_iter()
            .find(|task| task.title() == title)
            .ok_or_else(|| eyre::eyre!("no task titled {title:?}"))
    }
}

impl Default for SprintCloseWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SprintCloseWorld {
    SprintCloseWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a step argument such as `"A", "B"` into its quoted names.
#[must_use]
pub fn quoted_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().trim_matches('"').to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}
