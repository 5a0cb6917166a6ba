//! Walks through a sprint on an in-memory board.
//!
//! Usage:
//!
//! ```text
//! SPRINTBOARD_LOG=debug board_demo
//! ```
//!
//! The demo plans and starts a sprint, creates a few tasks, moves one across
//! the board, closes the sprint into the backlog, and logs the final board as
//! JSON. Configuration is read from the `SPRINTBOARD_*` environment
//! variables.

use std::sync::Arc;

use chrono::{Days, Utc};
use sprintboard::config::{BoardConfig, ConfigError};
use sprintboard::session::{
    adapters::{TracingNotifier, memory::InMemoryPreferenceStore},
    domain::UserId,
    services::{BoardSession, BoardSessionError, BoardSessionPorts, BoardView},
};
use sprintboard::sprint::adapters::memory::InMemorySprintRepository;
use sprintboard::task::{adapters::memory::InMemoryTaskRepository, services::DragEndEvent};
use sprintboard::telemetry::{TelemetryError, init_tracing};
use sprintboard::workspace::{
    adapters::memory::InMemoryWorkspaceRepository,
    domain::{Methodology, Step, StepPipeline, Workspace, WorkspaceDomainError},
    ports::WorkspaceRepositoryError,
};
use thiserror::Error;
use tracing::info;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

type DemoSession =
    BoardSession<InMemoryTaskRepository, InMemorySprintRepository, InMemoryWorkspaceRepository>;

/// Errors that can stop the demo.
#[derive(Debug, Error)]
enum DemoError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to start async runtime: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error("invalid demo workspace: {0}")]
    Workspace(#[from] WorkspaceDomainError),
    #[error(transparent)]
    Seed(#[from] WorkspaceRepositoryError),
    #[error(transparent)]
    Session(#[from] BoardSessionError),
    #[error("failed to render board: {0}")]
    Render(#[from] serde_json::Error),
    #[error("demo step failed: {0}")]
    Step(String),
}

fn main() -> Result<(), BoxError> {
    let config = BoardConfig::from_env().map_err(DemoError::from)?;
    init_tracing(&config).map_err(DemoError::from)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(DemoError::RuntimeInit)?;
    runtime.block_on(run(config))?;
    Ok(())
}

async fn run(config: BoardConfig) -> Result<(), DemoError> {
    let workspace = demo_workspace()?;
    let workspaces = Arc::new(InMemoryWorkspaceRepository::new());
    workspaces.insert(workspace.clone())?;
    let mut session: DemoSession = BoardSession::new(
        UserId::new(),
        config,
        BoardSessionPorts {
            tasks: Arc::new(InMemoryTaskRepository::new()),
            sprints: Arc::new(InMemorySprintRepository::new()),
            workspaces,
            preferences: Arc::new(InMemoryPreferenceStore::new()),
            notifier: Arc::new(TracingNotifier),
        },
    );

    session.open_workspace(workspace.id()).await?;
    let today = Utc::now().date_naive();
    let end = today
        .checked_add_days(Days::new(13))
        .ok_or_else(|| DemoError::Step("sprint end date out of range".to_owned()))?;
    let sprint = session.plan_sprint("Sprint 1", today, end).await?;
    session.activate_sprint(sprint.id()).await?.view?;

    for title in ["Design schema", "Build API", "Write docs"] {
        let draft = session.draft_task(title)?;
        session.create_task(draft).await?;
    }

    let first = session
        .store()
        .tasks()
        .map_err(BoardSessionError::from)?
        .into_iter()
        .next()
        .ok_or_else(|| DemoError::Step("no task to move".to_owned()))?;
    let done = workspace.pipeline().done_step().id();
    session
        .on_drag_end(DragEndEvent::dropped_on(first.id(), done))
        .await?;
    log_board("sprint board", &session.board()?)?;

    let migration = session.default_migration(sprint.id()).await?;
    let closed = session.close_sprint(sprint.id(), migration).await?;
    info!(
        kept = closed.outcome.kept.len(),
        relocated = closed.outcome.relocated.len(),
        "sprint closed"
    );
    log_board("backlog after close", &closed.view?)?;
    Ok(())
}

fn demo_workspace() -> Result<Workspace, DemoError> {
    let pipeline = StepPipeline::from_steps(vec![
        Step::new("To do")?,
        Step::new("In progress")?,
        Step::new("Review")?,
        Step::new("Done")?,
    ])?;
    Ok(Workspace::new("Demo", Methodology::Scrum, pipeline)?)
}

fn log_board(label: &str, view: &BoardView) -> Result<(), DemoError> {
    let rendered = serde_json::to_string_pretty(view)?;
    info!(tasks = view.task_count(), "{label}:\n{rendered}");
    Ok(())
}
