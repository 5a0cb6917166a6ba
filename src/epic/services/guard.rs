//! Referential-integrity checks for epic/task links.

use crate::epic::domain::{Epic, EpicGuardError};
use crate::task::domain::Task;

/// Precondition checks that refuse deletions which would orphan epic links.
///
/// The guard never unlinks anything itself; callers unlink through a task
/// update and retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpicAssociationGuard;

impl EpicAssociationGuard {
    /// Refuses deletion of a task that is still linked to an epic.
    ///
    /// # Errors
    ///
    /// Returns [`EpicGuardError::TaskLinkedToEpic`] when the task has an
    /// epic.
    pub fn ensure_task_deletable(task: &Task) -> Result<(), EpicGuardError> {
        task.epic_id().map_or(Ok(()), |epic_id| {
            Err(EpicGuardError::TaskLinkedToEpic {
                task_id: task.id(),
                epic_id,
            })
        })
    }

    /// Refuses deletion of a batch when any task is linked to an epic.
    ///
    /// # Errors
    ///
    /// Returns the error for the first linked task in batch order.
    pub fn ensure_tasks_deletable<'a>(
        tasks: impl IntoIterator<Item = &'a Task>,
    ) -> Result<(), EpicGuardError> {
        tasks.into_iter().try_for_each(Self::ensure_task_deletable)
    }

    /// Refuses deletion of an epic that still has linked tasks.
    ///
    /// # Errors
    ///
    /// Returns [`EpicGuardError::EpicHasTasks`] when the linked-task count is
    /// non-zero.
    pub const fn ensure_epic_deletable(epic: &Epic) -> Result<(), EpicGuardError> {
        if epic.task_count() > 0 {
            return Err(EpicGuardError::EpicHasTasks {
                epic_id: epic.id(),
                task_count: epic.task_count(),
            });
        }
        Ok(())
    }
}
