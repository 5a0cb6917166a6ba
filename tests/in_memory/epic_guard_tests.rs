//! Epic/task links blocking deletion on both sides.

use super::helpers::{Board, board};
use rstest::rstest;
use sprintboard::config::BoardConfig;
use sprintboard::epic::{
    adapters::memory::InMemoryEpicRepository,
    domain::EpicGuardError,
    services::{EpicService, EpicServiceError},
};
use sprintboard::session::services::BoardSessionError;
use sprintboard::task::domain::TaskPatch;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn linked_task_and_epic_are_deletable_only_after_unlinking(
    board: Board,
) -> eyre::Result<()> {
    let epics = EpicService::new(Arc::new(InMemoryEpicRepository::new(
        board.tasks.as_ref().clone(),
    )));
    let epic = epics.create(board.kanban.id(), "Data retention").await?;
    let mut session = board.session(BoardConfig::default());
    session.open_workspace(board.kanban.id()).await?;
    let draft = session.draft_task("Purge old exports")?.with_epic(epic.id());
    session.create_task(draft).await?;
    let task_id = board
        .tasks
        .all()?
        .first()
        .map(|task| task.id())
        .ok_or_else(|| eyre::eyre!("task not stored"))?;

    let blocked_task = session.remove_tasks(&[task_id]).await;
    eyre::ensure!(matches!(
        blocked_task,
        Err(BoardSessionError::BlockedByAssociation(
            EpicGuardError::TaskLinkedToEpic { .. }
        ))
    ));
    let blocked_epic = epics.delete(epic.id()).await;
    eyre::ensure!(matches!(
        blocked_epic,
        Err(EpicServiceError::BlockedByAssociation(
            EpicGuardError::EpicHasTasks { task_count: 1, .. }
        ))
    ));
    eyre::ensure!(board.tasks.all()?.len() == 1);

    session
        .update_task(task_id, TaskPatch::new().unlink_epic())
        .await?;
    epics.delete(epic.id()).await?;
    let view = session.remove_tasks(&[task_id]).await?;

    eyre::ensure!(view.task_count() == 0);
    eyre::ensure!(board.tasks.all()?.is_empty());
    eyre::ensure!(epics.list(board.kanban.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_linked_task_blocks_the_whole_batch(board: Board) -> eyre::Result<()> {
    let epics = EpicService::new(Arc::new(InMemoryEpicRepository::new(
        board.tasks.as_ref().clone(),
    )));
    let epic = epics.create(board.kanban.id(), "Compliance").await?;
    let mut session = board.session(BoardConfig::default());
    session.open_workspace(board.kanban.id()).await?;
    let free = session.draft_task("Free task")?;
    session.create_task(free).await?;
    let linked = session.draft_task("Linked task")?.with_epic(epic.id());
    session.create_task(linked).await?;
    let ids: Vec<_> = board.tasks.all()?.iter().map(|task| task.id()).collect();

    let result = session.remove_tasks(&ids).await;

    eyre::ensure!(matches!(
        result,
        Err(BoardSessionError::BlockedByAssociation(_))
    ));
    eyre::ensure!(board.tasks.all()?.len() == 2);
    eyre::ensure!(session.board()?.task_count() == 2);
    let message = board
        .notifier
        .last()
        .map(|notice| notice.message)
        .unwrap_or_default();
    eyre::ensure!(message.contains("blocked by association"));
    Ok(())
}
