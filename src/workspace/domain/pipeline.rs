//! Ordered step pipeline defining the columns of a workspace board.

use super::{StepId, WorkspaceDomainError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named stage that a task can occupy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StepRecord")]
pub struct Step {
    id: StepId,
    name: String,
}

impl Step {
    /// Creates a catalog step with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyStepName`] when the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        Self::with_id(StepId::new(), name)
    }

    /// Creates a catalog step with a known identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyStepName`] when the name is blank.
    pub fn with_id(id: StepId, name: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkspaceDomainError::EmptyStepName);
        }
        Ok(Self {
            id,
            name: trimmed.to_owned(),
        })
    }

    /// Returns the step identifier.
    #[must_use]
    pub const fn id(&self) -> StepId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Deserialize)]
struct StepRecord {
    id: StepId,
    name: String,
}

impl TryFrom<StepRecord> for Step {
    type Error = WorkspaceDomainError;

    fn try_from(record: StepRecord) -> Result<Self, Self::Error> {
        Self::with_id(record.id, record.name)
    }
}

/// A step reference paired with its configured position in one pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineEntry {
    /// The referenced catalog step.
    pub step: Step,
    /// Configured position; higher values sit further right on the board.
    pub order: u32,
}

impl PipelineEntry {
    /// Pairs a step with its pipeline order.
    #[must_use]
    pub const fn new(step: Step, order: u32) -> Self {
        Self { step, order }
    }
}

/// A board column as exposed to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Step backing the column.
    pub step_id: StepId,
    /// Column title.
    pub title: String,
}

/// Workspace-scoped ordered list of steps.
///
/// The pipeline is never empty: the first entry is the entry step and the
/// last entry (highest order) is the done step. Serialized as a flat entry
/// list; deserializing runs the same checks as [`StepPipeline::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PipelineEntry>", into = "Vec<PipelineEntry>")]
pub struct StepPipeline {
    head: PipelineEntry,
    tail: Vec<PipelineEntry>,
}

impl StepPipeline {
    /// Builds a pipeline from entries given in any order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyPipeline`] for an empty list,
    /// [`WorkspaceDomainError::DuplicateStepOrder`] when two entries share an
    /// order, and [`WorkspaceDomainError::DuplicateStep`] when a step is
    /// referenced twice.
    pub fn new(entries: impl IntoIterator<Item = PipelineEntry>) -> Result<Self, WorkspaceDomainError> {
        let mut sorted: Vec<PipelineEntry> = entries.into_iter().collect();
        sorted.sort_by_key(|entry| entry.order);

        let mut seen_steps = HashSet::with_capacity(sorted.len());
        let mut previous_order = None;
        for entry in &sorted {
            if previous_order == Some(entry.order) {
                return Err(WorkspaceDomainError::DuplicateStepOrder(entry.order));
            }
            if !seen_steps.insert(entry.step.id()) {
                return Err(WorkspaceDomainError::DuplicateStep(entry.step.id()));
            }
            previous_order = Some(entry.order);
        }

        let mut iter = sorted.into_iter();
        let head = iter.next().ok_or(WorkspaceDomainError::EmptyPipeline)?;
        Ok(Self {
            head,
            tail: iter.collect(),
        })
    }

    /// Builds a pipeline from steps in board order, numbering them from zero.
    ///
    /// # Errors
    ///
    /// See [`StepPipeline::new`].
    pub fn from_steps(steps: impl IntoIterator<Item = Step>) -> Result<Self, WorkspaceDomainError> {
        Self::new(
            steps
                .into_iter()
                .zip(0_u32..)
                .map(|(step, order)| PipelineEntry::new(step, order)),
        )
    }

    /// Iterates entries from entry step to done step.
    pub fn entries(&self) -> impl Iterator<Item = &PipelineEntry> {
        std::iter::once(&self.head).chain(self.tail.iter())
    }

    /// Iterates steps from entry step to done step.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.entries().map(|entry| &entry.step)
    }

    /// Returns the board columns in pipeline order.
    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        self.steps()
            .map(|step| Column {
                step_id: step.id(),
                title: step.name().to_owned(),
            })
            .collect()
    }

    /// Returns the first step of the pipeline.
    #[must_use]
    pub const fn entry_step(&self) -> &Step {
        &self.head.step
    }

    /// Returns the step with the highest configured order.
    #[must_use]
    pub fn done_step(&self) -> &Step {
        self.tail.last().map_or(&self.head.step, |entry| &entry.step)
    }

    /// Returns whether `step_id` is the done step.
    #[must_use]
    pub fn is_done(&self, step_id: StepId) -> bool {
        self.done_step().id() == step_id
    }

    /// Returns whether the pipeline references `step_id`.
    #[must_use]
    pub fn contains(&self, step_id: StepId) -> bool {
        self.position(step_id).is_some()
    }

    /// Returns the zero-based column index of `step_id`.
    #[must_use]
    pub fn position(&self, step_id: StepId) -> Option<usize> {
        self.steps().position(|step| step.id() == step_id)
    }

    /// Returns the step with the given identifier.
    #[must_use]
    pub fn step(&self, step_id: StepId) -> Option<&Step> {
        self.steps().find(|step| step.id() == step_id)
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tail.len() + 1
    }

    /// Always `false`; a pipeline holds at least one step.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl TryFrom<Vec<PipelineEntry>> for StepPipeline {
    type Error = WorkspaceDomainError;

    fn try_from(entries: Vec<PipelineEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<StepPipeline> for Vec<PipelineEntry> {
    fn from(pipeline: StepPipeline) -> Self {
        let StepPipeline { head, mut tail } = pipeline;
        tail.insert(0, head);
        tail
    }
}
