//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::fixture;
use sprintboard::config::BoardConfig;
use sprintboard::session::{
    adapters::memory::{InMemoryPreferenceStore, RecordingNotifier},
    domain::UserId,
    services::{BoardSession, BoardSessionPorts},
};
use sprintboard::sprint::adapters::memory::InMemorySprintRepository;
use sprintboard::task::adapters::memory::InMemoryTaskRepository;
use sprintboard::workspace::{
    adapters::memory::InMemoryWorkspaceRepository,
    domain::{Methodology, Step, StepId, StepPipeline, Workspace},
};

/// Session type wired to in-memory adapters.
pub type TestSession =
    BoardSession<InMemoryTaskRepository, InMemorySprintRepository, InMemoryWorkspaceRepository>;

/// Shared adapters plus one Scrum and one Kanban workspace.
pub struct Board {
    pub scrum: Workspace,
    pub kanban: Workspace,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub sprints: Arc<InMemorySprintRepository>,
    pub workspaces: Arc<InMemoryWorkspaceRepository>,
    pub preferences: Arc<InMemoryPreferenceStore>,
    pub notifier: RecordingNotifier,
    pub user: UserId,
}

impl Board {
    /// Opens a session over the shared adapters.
    #[must_use]
    pub fn session(&self, config: BoardConfig) -> TestSession {
        let preferences: Arc<InMemoryPreferenceStore> = Arc::clone(&self.preferences);
        BoardSession::new(
            self.user,
            config,
            BoardSessionPorts {
                tasks: Arc::clone(&self.tasks),
                sprints: Arc::clone(&self.sprints),
                workspaces: Arc::clone(&self.workspaces),
                preferences,
                notifier: Arc::new(self.notifier.clone()),
            },
        )
    }

    /// Returns the Scrum pipeline step at `position`.
    ///
    /// # Panics
    ///
    /// Panics when the pipeline has fewer steps.
    #[must_use]
    pub fn step(&self, position: usize) -> StepId {
        self.scrum
            .pipeline()
            .steps()
            .nth(position)
            .map(Step::id)
            .expect("pipeline step")
    }

    /// Returns the Scrum done step.
    #[must_use]
    pub fn done(&self) -> StepId {
        self.scrum.pipeline().done_step().id()
    }
}

/// Returns a date in September 2026.
///
/// # Panics
///
/// Panics for days September does not have.
#[must_use]
pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, day).expect("valid date")
}

fn pipeline() -> StepPipeline {
    StepPipeline::from_steps(vec![
        Step::new("To do").expect("step"),
        Step::new("In progress").expect("step"),
        Step::new("Review").expect("step"),
        Step::new("Done").expect("step"),
    ])
    .expect("pipeline")
}

/// Provides fresh adapters for each test.
#[fixture]
pub fn board() -> Board {
    let scrum = Workspace::new("Product", Methodology::Scrum, pipeline()).expect("workspace");
    let kanban = Workspace::new("Support", Methodology::Kanban, pipeline()).expect("workspace");
    let workspaces = Arc::new(InMemoryWorkspaceRepository::new());
    workspaces.insert(scrum.clone()).expect("stored");
    workspaces.insert(kanban.clone()).expect("stored");
    Board {
        scrum,
        kanban,
        tasks: Arc::new(InMemoryTaskRepository::new()),
        sprints: Arc::new(InMemorySprintRepository::new()),
        workspaces,
        preferences: Arc::new(InMemoryPreferenceStore::new()),
        notifier: RecordingNotifier::new(),
        user: UserId::new(),
    }
}
