//! Board cache tests: loading, mutations, and optimistic moves.

use std::sync::Arc;

use crate::sprint::domain::SprintId;
use crate::task::{
    adapters::memory::{InMemoryTaskRepository, TaskOperation},
    domain::{NewTask, Task, TaskId, TaskPatch},
    ports::{MockTaskRepository, SprintScope, TaskRepository, TaskRepositoryError},
    services::{BoardError, BoardTaskStore, DragEndEvent},
};
use crate::workspace::domain::{StepId, WorkspaceId};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Harness {
    workspace_id: WorkspaceId,
    todo: StepId,
    doing: StepId,
    repository: Arc<InMemoryTaskRepository>,
    store: BoardTaskStore<InMemoryTaskRepository>,
}

impl Harness {
    async fn seed(&self, title: &str, sprint_id: Option<SprintId>) -> Task {
        let mut draft = NewTask::new(self.workspace_id, self.todo, title).expect("valid task");
        if let Some(id) = sprint_id {
            draft = draft.in_sprint(id);
        }
        self.repository.create(draft).await.expect("task seeded")
    }
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryTaskRepository::new());
    Harness {
        workspace_id: WorkspaceId::new(),
        todo: StepId::new(),
        doing: StepId::new(),
        store: BoardTaskStore::new(Arc::clone(&repository)),
        repository,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_replaces_cache_with_scoped_tasks(harness: Harness) -> eyre::Result<()> {
    let sprint_id = SprintId::new();
    let backlog = harness.seed("Backlog item", None).await;
    harness.seed("Sprint item", Some(sprint_id)).await;

    let projection = harness
        .store
        .load_by_workspace(harness.workspace_id, SprintScope::Backlog)
        .await?;

    eyre::ensure!(projection.tasks_in(harness.todo) == [backlog]);
    eyre::ensure!(!harness.store.is_loading()?);
    let scope = harness.store.scope()?.ok_or_else(|| eyre::eyre!("no scope"))?;
    eyre::ensure!(scope.sprint == SprintScope::Backlog);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_load_keeps_previous_cache(harness: Harness) -> eyre::Result<()> {
    harness.seed("Kept", None).await;
    harness
        .store
        .load_by_workspace(harness.workspace_id, SprintScope::Unscoped)
        .await?;
    let before = harness.store.tasks()?;
    harness.repository.fail_next(TaskOperation::List)?;

    let result = harness
        .store
        .load_by_workspace(harness.workspace_id, SprintScope::Unscoped)
        .await;

    eyre::ensure!(matches!(result, Err(BoardError::Load(_))));
    eyre::ensure!(harness.store.tasks()? == before);
    eyre::ensure!(!harness.store.is_loading()?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_appends_canonical_record_in_scope(harness: Harness) -> eyre::Result<()> {
    harness
        .store
        .load_by_workspace(harness.workspace_id, SprintScope::Backlog)
        .await?;

    let draft = NewTask::new(harness.workspace_id, harness.todo, "New card")?;
    harness.store.create(draft).await?;
    let other_sprint = NewTask::new(harness.workspace_id, harness.todo, "Elsewhere")?
        .in_sprint(SprintId::new());
    harness.store.create(other_sprint).await?;

    let titles: Vec<String> = harness
        .store
        .tasks()?
        .iter()
        .map(|task| task.title().to_owned())
        .collect();
    eyre::ensure!(titles == vec!["New card".to_owned()], "got {titles:?}");
    eyre::ensure!(harness.repository.all()?.len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_create_adds_nothing(harness: Harness) -> eyre::Result<()> {
    harness.repository.fail_next(TaskOperation::Create)?;

    let draft = NewTask::new(harness.workspace_id, harness.todo, "Lost")?;
    let result = harness.store.create(draft).await;

    eyre::ensure!(matches!(result, Err(BoardError::Create(_))));
    eyre::ensure!(harness.store.tasks()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_entry_in_place(harness: Harness) -> eyre::Result<()> {
    let first = harness.seed("First", None).await;
    let second = harness.seed("Second", None).await;
    harness
        .store
        .load_by_workspace(harness.workspace_id, SprintScope::Unscoped)
        .await?;

    harness
        .store
        .update(first.id(), TaskPatch::new().with_title("First, renamed"))
        .await?;

    let tasks = harness.store.tasks()?;
    let ids: Vec<TaskId> = tasks.iter().map(Task::id).collect();
    eyre::ensure!(ids == vec![first.id(), second.id()]);
    eyre::ensure!(tasks.first().map(Task::title) == Some("First, renamed"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_update_leaves_cache_unchanged(harness: Harness) -> eyre::Result<()> {
    let task = harness.seed("Original", None).await;
    harness
        .store
        .load_by_workspace(harness.workspace_id, SprintScope::Unscoped)
        .await?;

    let result = harness
        .store
        .update(task.id(), TaskPatch::new().with_title("   "))
        .await;

    eyre::ensure!(matches!(
        result,
        Err(BoardError::Update {
            source: TaskRepositoryError::Rejected { .. },
            ..
        })
    ));
    eyre::ensure!(harness.store.cached(task.id())? == Some(task));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_many_drops_deleted_tasks(harness: Harness) -> eyre::Result<()> {
    let gone = harness.seed("Gone", None).await;
    let stays = harness.seed("Stays", None).await;
    harness
        .store
        .load_by_workspace(harness.workspace_id, SprintScope::Unscoped)
        .await?;

    harness.store.remove_many(&[gone.id()]).await?;

    eyre::ensure!(harness.store.tasks()? == vec![stays]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_delete_keeps_every_task(harness: Harness) -> eyre::Result<()> {
    let task = harness.seed("Still here", None).await;
    harness
        .store
        .load_by_workspace(harness.workspace_id, SprintScope::Unscoped)
        .await?;

    let result = harness.store.remove_many(&[task.id(), TaskId::new()]).await;

    eyre::ensure!(matches!(result, Err(BoardError::Delete(TaskRepositoryError::NotFound(_)))));
    eyre::ensure!(harness.store.tasks()? == vec![task]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drop_outside_or_on_same_column_is_a_no_op(harness: Harness) -> eyre::Result<()> {
    let task = harness.seed("Stay", None).await;
    harness
        .store
        .load_by_workspace(harness.workspace_id, SprintScope::Unscoped)
        .await?;
    harness.repository.fail_next(TaskOperation::MoveToStep)?;

    harness
        .store
        .on_drag_end(DragEndEvent::dropped_outside(task.id()))
        .await?;
    harness
        .store
        .on_drag_end(DragEndEvent::dropped_on(task.id(), harness.todo))
        .await?;

    eyre::ensure!(harness.store.cached(task.id())? == Some(task));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn successful_move_follows_canonical_record(harness: Harness) -> eyre::Result<()> {
    let task = harness.seed("Move me", None).await;
    harness
        .store
        .load_by_workspace(harness.workspace_id, SprintScope::Unscoped)
        .await?;

    let projection = harness
        .store
        .on_drag_end(DragEndEvent::dropped_on(task.id(), harness.doing))
        .await?;

    eyre::ensure!(projection.step_of(task.id()) == Some(harness.doing));
    eyre::ensure!(harness.repository.get(task.id()).await?.step_id() == harness.doing);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_move_rolls_back(harness: Harness) -> eyre::Result<()> {
    let task = harness.seed("Bounce", None).await;
    harness
        .store
        .load_by_workspace(harness.workspace_id, SprintScope::Unscoped)
        .await?;
    harness.repository.fail_next(TaskOperation::MoveToStep)?;

    let result = harness
        .store
        .on_drag_end(DragEndEvent::dropped_on(task.id(), harness.doing))
        .await;

    eyre::ensure!(matches!(result, Err(BoardError::Move { task_id, .. }) if task_id == task.id()));
    eyre::ensure!(harness.store.snapshot()?.step_of(task.id()) == Some(harness.todo));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dragging_an_unknown_task_is_reported(harness: Harness) {
    let result = harness
        .store
        .on_drag_end(DragEndEvent::dropped_on(TaskId::new(), harness.doing))
        .await;

    assert!(matches!(result, Err(BoardError::NotCached(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rollback_restores_snapshot_with_mocked_persistence() -> eyre::Result<()> {
    let workspace_id = WorkspaceId::new();
    let (todo, done) = (StepId::new(), StepId::new());
    let task = Task::create(
        TaskId::new(),
        NewTask::new(workspace_id, todo, "Mocked")?,
        &DefaultClock,
    );
    let listed = task.clone();

    let mut repository = MockTaskRepository::new();
    repository
        .expect_list()
        .times(1)
        .returning(move |_| Ok(vec![listed.clone()]));
    repository
        .expect_move_to_step()
        .withf(move |_, step| *step == done)
        .times(1)
        .returning(|id, _| Err(TaskRepositoryError::NotFound(id)));
    let store = BoardTaskStore::new(Arc::new(repository));
    store
        .load_by_workspace(workspace_id, SprintScope::Unscoped)
        .await?;

    let result = store
        .on_drag_end(DragEndEvent::dropped_on(task.id(), done))
        .await;

    eyre::ensure!(matches!(result, Err(BoardError::Move { .. })));
    eyre::ensure!(store.tasks()? == vec![task]);
    Ok(())
}
