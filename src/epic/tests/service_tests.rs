//! Service tests for guarded epic deletion.

use std::sync::Arc;

use crate::epic::{
    adapters::memory::InMemoryEpicRepository,
    domain::EpicGuardError,
    services::{EpicService, EpicServiceError},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{NewTask, TaskPatch},
    ports::TaskRepository,
};
use crate::workspace::domain::{StepId, WorkspaceId};
use rstest::{fixture, rstest};

struct Harness {
    tasks: InMemoryTaskRepository,
    service: EpicService<InMemoryEpicRepository>,
}

#[fixture]
fn harness() -> Harness {
    let tasks = InMemoryTaskRepository::new();
    let service = EpicService::new(Arc::new(InMemoryEpicRepository::new(tasks.clone())));
    Harness { tasks, service }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn epic_without_tasks_can_be_deleted(harness: Harness) -> eyre::Result<()> {
    let workspace_id = WorkspaceId::new();
    let epic = harness.service.create(workspace_id, "Onboarding").await?;

    harness.service.delete(epic.id()).await?;

    eyre::ensure!(harness.service.list(workspace_id).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn epic_with_linked_task_is_blocked_until_unlinked(harness: Harness) -> eyre::Result<()> {
    let workspace_id = WorkspaceId::new();
    let epic = harness.service.create(workspace_id, "Billing").await?;
    let draft = NewTask::new(workspace_id, StepId::new(), "Invoice export")?.with_epic(epic.id());
    let task = harness.tasks.create(draft).await?;

    let blocked = harness.service.delete(epic.id()).await;
    eyre::ensure!(
        matches!(
            blocked,
            Err(EpicServiceError::BlockedByAssociation(
                EpicGuardError::EpicHasTasks { task_count: 1, .. }
            ))
        ),
        "expected association block, got {blocked:?}"
    );

    harness
        .tasks
        .update(task.id(), TaskPatch::new().unlink_epic())
        .await?;
    harness.service.delete(epic.id()).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_unknown_epic_reports_not_found(harness: Harness) {
    let missing = crate::epic::domain::EpicId::new();

    let result = harness.service.delete(missing).await;

    assert!(matches!(result, Err(EpicServiceError::NotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_epic_title_is_rejected(harness: Harness) {
    let result = harness.service.create(WorkspaceId::new(), "   ").await;

    assert!(matches!(result, Err(EpicServiceError::Domain(_))));
}
