//! Column-ordered board view handed to the UI.

use crate::task::{domain::Task, ports::SprintScope, services::TasksByStep};
use crate::workspace::domain::{StepId, StepPipeline, WorkspaceId};
use serde::Serialize;

/// One board column and the tasks it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    /// Step backing the column.
    pub step_id: StepId,
    /// Column title.
    pub title: String,
    /// Tasks in arrival order.
    pub tasks: Vec<Task>,
}

/// The board as rendered: every pipeline column in order, even empty ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// Workspace shown.
    pub workspace_id: WorkspaceId,
    /// Sprint filter applied.
    pub scope: SprintScope,
    /// Columns in pipeline order.
    pub columns: Vec<BoardColumn>,
}

impl BoardView {
    pub(crate) fn build(
        workspace_id: WorkspaceId,
        pipeline: &StepPipeline,
        scope: SprintScope,
        projection: &TasksByStep,
    ) -> Self {
        let columns = pipeline
            .columns()
            .into_iter()
            .map(|column| BoardColumn {
                tasks: projection.tasks_in(column.step_id).to_vec(),
                step_id: column.step_id,
                title: column.title,
            })
            .collect();
        Self {
            workspace_id,
            scope,
            columns,
        }
    }

    /// Returns the column backed by `step_id`.
    #[must_use]
    pub fn column(&self, step_id: StepId) -> Option<&BoardColumn> {
        self.columns.iter().find(|column| column.step_id == step_id)
    }

    /// Returns the number of tasks on the board.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }
}
