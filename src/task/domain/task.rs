//! Task record, creation payload, and patch types.

use super::{TaskDomainError, TaskId};
use crate::epic::domain::EpicId;
use crate::sprint::domain::SprintId;
use crate::workspace::domain::{StepId, WorkspaceId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Canonical task entity as returned by task persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    workspace_id: WorkspaceId,
    step_id: StepId,
    sprint_id: Option<SprintId>,
    epic_id: Option<EpicId>,
    title: String,
    description: Option<String>,
    priority: Option<String>,
    assignee: Option<String>,
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Materialises a task from a validated creation payload.
    ///
    /// Used by persistence adapters, which own identifier assignment.
    #[must_use]
    pub fn create(id: TaskId, draft: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            workspace_id: draft.workspace_id,
            step_id: draft.step_id,
            sprint_id: draft.sprint_id,
            epic_id: draft.epic_id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            assignee: draft.assignee,
            start_date: draft.start_date,
            due_date: draft.due_date,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the current pipeline step.
    #[must_use]
    pub const fn step_id(&self) -> StepId {
        self.step_id
    }

    /// Returns the sprint the task belongs to; `None` means backlog.
    #[must_use]
    pub const fn sprint_id(&self) -> Option<SprintId> {
        self.sprint_id
    }

    /// Returns the linked epic, if any.
    #[must_use]
    pub const fn epic_id(&self) -> Option<EpicId> {
        self.epic_id
    }

    /// Returns whether the task sits in the backlog.
    #[must_use]
    pub const fn is_in_backlog(&self) -> bool {
        self.sprint_id.is_none()
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the priority label.
    #[must_use]
    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// Returns the assignee handle.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the planned start date.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the planned due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a patch, leaving the task untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title and
    /// [`TaskDomainError::InvalidSchedule`] when the resulting due date
    /// precedes the start date.
    pub fn apply(&mut self, patch: TaskPatch, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let title = patch
            .title
            .map(normalize_title)
            .transpose()?
            .unwrap_or_else(|| self.title.clone());
        let start_date = patch.start_date.unwrap_or(self.start_date);
        let due_date = patch.due_date.unwrap_or(self.due_date);
        validate_schedule(start_date, due_date)?;

        self.title = title;
        self.start_date = start_date;
        self.due_date = due_date;
        if let Some(step_id) = patch.step_id {
            self.step_id = step_id;
        }
        if let Some(sprint_id) = patch.sprint_id {
            self.sprint_id = sprint_id;
        }
        if let Some(epic_id) = patch.epic_id {
            self.epic_id = epic_id;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = assignee;
        }
        self.touch(clock);
        Ok(())
    }

    /// Moves the task to another pipeline step.
    pub fn move_to_step(&mut self, step_id: StepId, clock: &impl Clock) {
        self.step_id = step_id;
        self.touch(clock);
    }

    /// Places the task in a column of a local projection without touching
    /// persisted timestamps.
    pub(crate) const fn place_in_step(&mut self, step_id: StepId) {
        self.step_id = step_id;
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Creation payload for a task; the identifier is assigned by persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    workspace_id: WorkspaceId,
    step_id: StepId,
    sprint_id: Option<SprintId>,
    epic_id: Option<EpicId>,
    title: String,
    description: Option<String>,
    priority: Option<String>,
    assignee: Option<String>,
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
}

impl NewTask {
    /// Creates a backlog task payload with the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        workspace_id: WorkspaceId,
        step_id: StepId,
        title: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            workspace_id,
            step_id,
            sprint_id: None,
            epic_id: None,
            title: normalize_title(title.into())?,
            description: None,
            priority: None,
            assignee: None,
            start_date: None,
            due_date: None,
        })
    }

    /// Places the task in a sprint instead of the backlog.
    #[must_use]
    pub const fn in_sprint(mut self, sprint_id: SprintId) -> Self {
        self.sprint_id = Some(sprint_id);
        self
    }

    /// Links the task to an epic.
    #[must_use]
    pub const fn with_epic(mut self, epic_id: EpicId) -> Self {
        self.epic_id = Some(epic_id);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority label.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets the planned schedule.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidSchedule`] when `due` precedes
    /// `start`.
    pub fn with_schedule(
        mut self,
        start: Option<NaiveDate>,
        due: Option<NaiveDate>,
    ) -> Result<Self, TaskDomainError> {
        validate_schedule(start, due)?;
        self.start_date = start;
        self.due_date = due;
        Ok(self)
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the initial pipeline step.
    #[must_use]
    pub const fn step_id(&self) -> StepId {
        self.step_id
    }

    /// Returns the initial sprint.
    #[must_use]
    pub const fn sprint_id(&self) -> Option<SprintId> {
        self.sprint_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Partial update for a task.
///
/// Outer `None` leaves a field unchanged; for nullable fields the inner
/// `Option` carries the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New priority label.
    pub priority: Option<Option<String>>,
    /// New assignee.
    pub assignee: Option<Option<String>>,
    /// New pipeline step.
    pub step_id: Option<StepId>,
    /// New sprint; `Some(None)` sends the task to the backlog.
    pub sprint_id: Option<Option<SprintId>>,
    /// New epic link; `Some(None)` unlinks the epic.
    pub epic_id: Option<Option<EpicId>>,
    /// New start date.
    pub start_date: Option<Option<NaiveDate>>,
    /// New due date.
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Sets a new assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Option<String>) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets a new priority label.
    #[must_use]
    pub fn with_priority(mut self, priority: Option<String>) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Moves the task to another step.
    #[must_use]
    pub const fn with_step(mut self, step_id: StepId) -> Self {
        self.step_id = Some(step_id);
        self
    }

    /// Reassigns the sprint; `None` sends the task to the backlog.
    #[must_use]
    pub const fn with_sprint(mut self, sprint_id: Option<SprintId>) -> Self {
        self.sprint_id = Some(sprint_id);
        self
    }

    /// Links the task to an epic.
    #[must_use]
    pub const fn link_epic(mut self, epic_id: EpicId) -> Self {
        self.epic_id = Some(Some(epic_id));
        self
    }

    /// Clears the epic link.
    #[must_use]
    pub const fn unlink_epic(mut self) -> Self {
        self.epic_id = Some(None);
        self
    }

    /// Sets the planned schedule.
    #[must_use]
    pub const fn with_schedule(mut self, start: Option<NaiveDate>, due: Option<NaiveDate>) -> Self {
        self.start_date = Some(start);
        self.due_date = Some(due);
        self
    }

    /// Returns the step this patch moves the task to, if any.
    #[must_use]
    pub const fn target_step(&self) -> Option<StepId> {
        self.step_id
    }

    /// Returns whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn normalize_title(raw: String) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn validate_schedule(
    start: Option<NaiveDate>,
    due: Option<NaiveDate>,
) -> Result<(), TaskDomainError> {
    match (start, due) {
        (Some(start_date), Some(due_date)) if due_date < start_date => {
            Err(TaskDomainError::InvalidSchedule {
                start: start_date,
                due: due_date,
            })
        }
        _ => Ok(()),
    }
}
