//! Read-only task-by-step projection of a board cache.

use crate::task::domain::{Task, TaskId};
use crate::workspace::domain::StepId;

/// Tasks grouped by their current step.
///
/// Columns appear in the order their first task arrived; within a column
/// tasks keep arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TasksByStep {
    columns: Vec<(StepId, Vec<Task>)>,
}

impl TasksByStep {
    /// Groups tasks by step, preserving arrival order.
    #[must_use]
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut columns: Vec<(StepId, Vec<Task>)> = Vec::new();
        for task in tasks {
            match columns.iter_mut().find(|(step, _)| *step == task.step_id()) {
                Some((_, column)) => column.push(task.clone()),
                None => columns.push((task.step_id(), vec![task.clone()])),
            }
        }
        Self { columns }
    }

    /// Returns the tasks currently in `step_id`.
    #[must_use]
    pub fn tasks_in(&self, step_id: StepId) -> &[Task] {
        self.columns
            .iter()
            .find(|(step, _)| *step == step_id)
            .map_or(&[], |(_, tasks)| tasks.as_slice())
    }

    /// Returns the step a task currently sits in.
    #[must_use]
    pub fn step_of(&self, task_id: TaskId) -> Option<StepId> {
        self.task(task_id).map(Task::step_id)
    }

    /// Finds a task anywhere on the board.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.columns
            .iter()
            .flat_map(|(_, tasks)| tasks.iter())
            .find(|task| task.id() == task_id)
    }

    /// Iterates non-empty columns.
    pub fn columns(&self) -> impl Iterator<Item = (StepId, &[Task])> {
        self.columns
            .iter()
            .map(|(step, tasks)| (*step, tasks.as_slice()))
    }

    /// Returns the total number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.iter().map(|(_, tasks)| tasks.len()).sum()
    }

    /// Returns whether the board holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
