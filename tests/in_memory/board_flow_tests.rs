//! End-to-end board flows through a session backed by in-memory adapters.

use super::helpers::{Board, board};
use rstest::rstest;
use sprintboard::config::BoardConfig;
use sprintboard::session::services::BoardSessionError;
use sprintboard::task::{
    adapters::memory::TaskOperation,
    domain::TaskPatch,
    ports::SprintScope,
    services::{BoardError, DragEndEvent},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn kanban_board_walks_a_task_to_done(board: Board) -> eyre::Result<()> {
    let mut session = board.session(BoardConfig::default());
    let opened = session.open_workspace(board.kanban.id()).await?;
    eyre::ensure!(opened.scope == SprintScope::Unscoped);
    eyre::ensure!(opened.columns.len() == 4);

    let draft = session.draft_task("Rotate certificates")?;
    let created = session.create_task(draft).await?;
    let entry = board.kanban.pipeline().entry_step().id();
    let task_id = created
        .column(entry)
        .and_then(|column| column.tasks.first())
        .map(|task| task.id())
        .ok_or_else(|| eyre::eyre!("created task missing from entry column"))?;

    let done = board.kanban.pipeline().done_step().id();
    let moved = session
        .on_drag_end(DragEndEvent::dropped_on(task_id, done))
        .await?;

    let done_column = moved
        .column(done)
        .ok_or_else(|| eyre::eyre!("done column missing"))?;
    eyre::ensure!(done_column.tasks.iter().any(|task| task.id() == task_id));
    eyre::ensure!(moved.task_count() == 1);
    let stored = board.tasks.all()?;
    eyre::ensure!(stored.iter().all(|task| task.step_id() == done));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_move_snaps_back_and_reports_an_error(board: Board) -> eyre::Result<()> {
    let mut session = board.session(BoardConfig::default());
    session.open_workspace(board.scrum.id()).await?;
    let draft = session.draft_task("Draft release notes")?;
    session.create_task(draft).await?;
    let task_id = board
        .tasks
        .all()?
        .first()
        .map(|task| task.id())
        .ok_or_else(|| eyre::eyre!("task not stored"))?;
    board.tasks.fail_next(TaskOperation::MoveToStep)?;

    let result = session
        .on_drag_end(DragEndEvent::dropped_on(task_id, board.step(2)))
        .await;

    eyre::ensure!(matches!(
        result,
        Err(BoardSessionError::Board(BoardError::Move { .. }))
    ));
    let view = session.board()?;
    let entry = view
        .column(board.step(0))
        .ok_or_else(|| eyre::eyre!("entry column missing"))?;
    eyre::ensure!(entry.tasks.iter().any(|task| task.id() == task_id));
    eyre::ensure!(board.notifier.last().is_some_and(|notice| notice.is_error()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_session_sees_tasks_after_reload(board: Board) -> eyre::Result<()> {
    let mut writer = board.session(BoardConfig::default());
    writer.open_workspace(board.kanban.id()).await?;
    for title in ["Page on-call", "Archive logs"] {
        let draft = writer.draft_task(title)?;
        writer.create_task(draft).await?;
    }

    let mut reader = board.session(BoardConfig::default());
    let view = reader.open_workspace(board.kanban.id()).await?;

    eyre::ensure!(view.task_count() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_edit_keeps_the_cached_task(board: Board) -> eyre::Result<()> {
    let mut session = board.session(BoardConfig::default());
    session.open_workspace(board.kanban.id()).await?;
    let draft = session.draft_task("Renew domain")?;
    session.create_task(draft).await?;
    let task_id = board
        .tasks
        .all()?
        .first()
        .map(|task| task.id())
        .ok_or_else(|| eyre::eyre!("task not stored"))?;

    let result = session
        .update_task(task_id, TaskPatch::new().with_title("   "))
        .await;

    eyre::ensure!(result.is_err());
    let cached = session
        .store()
        .cached(task_id)?
        .ok_or_else(|| eyre::eyre!("task dropped from cache"))?;
    eyre::ensure!(cached.title() == "Renew domain");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn quiet_config_only_reports_failures(board: Board) -> eyre::Result<()> {
    let mut session = board.session(BoardConfig::default().with_notify_success(false));
    session.open_workspace(board.kanban.id()).await?;
    let draft = session.draft_task("Audit access")?;
    session.create_task(draft).await?;
    eyre::ensure!(board.notifier.notices().is_empty());

    board.tasks.fail_next(TaskOperation::Create)?;
    let failing = session.draft_task("Audit again")?;
    let result = session.create_task(failing).await;

    eyre::ensure!(result.is_err());
    let notices = board.notifier.notices();
    eyre::ensure!(notices.len() == 1);
    eyre::ensure!(notices.iter().all(|notice| notice.is_error()));
    Ok(())
}
