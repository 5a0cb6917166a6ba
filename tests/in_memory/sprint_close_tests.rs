//! Sprint activation and close flows through a board session.

use super::helpers::{Board, TestSession, board, date};
use rstest::rstest;
use sprintboard::config::{BoardConfig, CloseTarget};
use sprintboard::session::services::BoardSessionError;
use sprintboard::sprint::{
    domain::{Sprint, SprintMigration, SprintState},
    services::{MigrationError, SprintLifecycleError},
};
use sprintboard::task::{
    adapters::memory::TaskOperation, domain::TaskId, ports::SprintScope, services::DragEndEvent,
};

/// Opens the Scrum board, starts a sprint, and adds `titles` to it.
async fn running_sprint(
    board: &Board,
    session: &mut TestSession,
    titles: &[&str],
) -> eyre::Result<(Sprint, Vec<TaskId>)> {
    session.open_workspace(board.scrum.id()).await?;
    let sprint = session.plan_sprint("Sprint 1", date(1), date(14)).await?;
    session.activate_sprint(sprint.id()).await?;
    for title in titles {
        let draft = session.draft_task(*title)?;
        session.create_task(draft).await?;
    }
    let ids = board.tasks.all()?.iter().map(|task| task.id()).collect();
    Ok((sprint, ids))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closing_into_next_sprint_keeps_done_work(board: Board) -> eyre::Result<()> {
    let mut session = board.session(BoardConfig::default());
    let (sprint, ids) = running_sprint(&board, &mut session, &["Login", "Logout", "Signup"]).await?;
    let next = session.plan_sprint("Sprint 2", date(15), date(28)).await?;
    let finished = *ids.first().ok_or_else(|| eyre::eyre!("no tasks created"))?;
    session
        .on_drag_end(DragEndEvent::dropped_on(finished, board.done()))
        .await?;

    let closed = session
        .close_sprint(sprint.id(), SprintMigration::to_sprint(next.id()))
        .await?;
    let (report, view) = (closed.outcome, closed.view?);

    eyre::ensure!(report.kept == vec![finished]);
    eyre::ensure!(report.relocated.len() == 2);
    eyre::ensure!(report.sprint.state() == SprintState::Closed);
    eyre::ensure!(view.scope == SprintScope::Backlog);
    for task in board.tasks.all()? {
        let expected = if task.id() == finished { sprint.id() } else { next.id() };
        eyre::ensure!(task.sprint_id() == Some(expected), "task {} misplaced", task.id());
    }

    let next_view = session.activate_sprint(next.id()).await?.view?;
    eyre::ensure!(next_view.scope == SprintScope::Sprint(next.id()));
    eyre::ensure!(next_view.task_count() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closing_to_backlog_empties_the_sprint(board: Board) -> eyre::Result<()> {
    let mut session = board.session(BoardConfig::default());
    let (sprint, _) = running_sprint(&board, &mut session, &["Search", "Filters"]).await?;

    let closed = session
        .close_sprint(sprint.id(), SprintMigration::Backlog)
        .await?;
    let (report, view) = (closed.outcome, closed.view?);

    eyre::ensure!(report.relocated.len() == 2);
    eyre::ensure!(view.task_count() == 2);
    eyre::ensure!(board.tasks.all()?.iter().all(|task| task.is_in_backlog()));
    let closed = session.sprints().find(sprint.id()).await?;
    eyre::ensure!(closed.closed_with() == Some(SprintMigration::Backlog));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_relocation_leaves_sprint_untouched(board: Board) -> eyre::Result<()> {
    let mut session = board.session(BoardConfig::default());
    let (sprint, _) = running_sprint(&board, &mut session, &["Cart", "Checkout", "Invoice"]).await?;
    board.tasks.fail_after(TaskOperation::Update, 1)?;

    let result = session
        .close_sprint(sprint.id(), SprintMigration::Backlog)
        .await;

    match result {
        Err(BoardSessionError::Sprint(SprintLifecycleError::Migration(
            MigrationError::Relocation { unreverted, .. },
        ))) => eyre::ensure!(unreverted.is_empty()),
        other => eyre::bail!("expected relocation failure, got {other:?}"),
    }
    eyre::ensure!(
        board
            .tasks
            .all()?
            .iter()
            .all(|task| task.sprint_id() == Some(sprint.id()))
    );
    let still_active = session.sprints().find(sprint.id()).await?;
    eyre::ensure!(still_active.state() == SprintState::Active);
    eyre::ensure!(board.notifier.last().is_some_and(|notice| notice.is_error()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_activation_is_refused(board: Board) -> eyre::Result<()> {
    let mut session = board.session(BoardConfig::default());
    let (sprint, _) = running_sprint(&board, &mut session, &[]).await?;
    let other = session.plan_sprint("Sprint 2", date(15), date(28)).await?;

    let result = session.activate_sprint(other.id()).await;

    match result {
        Err(BoardSessionError::Sprint(SprintLifecycleError::ActivationConflict {
            active_sprint_id,
            ..
        })) => eyre::ensure!(active_sprint_id == sprint.id()),
        other_result => eyre::bail!("expected activation conflict, got {other_result:?}"),
    }
    let planned = session.sprints().find(other.id()).await?;
    eyre::ensure!(planned.state() == SprintState::Planning);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn next_sprint_target_preselects_earliest_open_sprint(board: Board) -> eyre::Result<()> {
    let config = BoardConfig::default().with_default_close_target(CloseTarget::NextSprint);
    let mut session = board.session(config);
    let (sprint, _) = running_sprint(&board, &mut session, &["Billing"]).await?;
    session.plan_sprint("Sprint 3", date(20), date(30)).await?;
    let earliest = session.plan_sprint("Sprint 2", date(15), date(19)).await?;

    let migration = session.default_migration(sprint.id()).await?;

    eyre::ensure!(migration == SprintMigration::to_sprint(earliest.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resumed_session_reopens_the_remembered_sprint(board: Board) -> eyre::Result<()> {
    let mut first = board.session(BoardConfig::default());
    let (sprint, _) = running_sprint(&board, &mut first, &["Onboarding"]).await?;
    first.open_backlog().await?;
    first.open_sprint(sprint.id()).await?;

    let mut second = board.session(BoardConfig::default());
    let view = second.resume().await?;

    eyre::ensure!(view.scope == SprintScope::Sprint(sprint.id()));
    eyre::ensure!(view.task_count() == 1);
    Ok(())
}
