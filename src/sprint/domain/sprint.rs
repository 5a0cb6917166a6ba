//! Sprint aggregate and lifecycle state machine.

use super::{ParseSprintStateError, SprintDomainError, SprintId, SprintMigration};
use crate::workspace::domain::WorkspaceId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sprint lifecycle state.
///
/// Transitions are linear: `Planning -> Active -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintState {
    /// Created but not yet started.
    Planning,
    /// The single running sprint of its workspace.
    Active,
    /// Finished; kept for history.
    Closed,
}

impl SprintState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Planning, Self::Active) | (Self::Active, Self::Closed)
        )
    }

    /// Returns whether no transition leaves this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns whether the sprint can still receive tasks.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for SprintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SprintState {
    type Error = ParseSprintStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "planning" => Ok(Self::Planning),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseSprintStateError(value.to_owned())),
        }
    }
}

/// Sprint aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    id: SprintId,
    workspace_id: WorkspaceId,
    name: String,
    planned_start: NaiveDate,
    planned_end: NaiveDate,
    is_active: bool,
    activated_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    closed_with: Option<SprintMigration>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Sprint {
    /// Creates a sprint in [`SprintState::Planning`] from a validated draft.
    #[must_use]
    pub fn plan(id: SprintId, draft: NewSprint, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            workspace_id: draft.workspace_id,
            name: draft.name,
            planned_start: draft.planned_start,
            planned_end: draft.planned_end,
            is_active: false,
            activated_at: None,
            closed_at: None,
            closed_with: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the sprint identifier.
    #[must_use]
    pub const fn id(&self) -> SprintId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the sprint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the planned start date.
    #[must_use]
    pub const fn planned_start(&self) -> NaiveDate {
        self.planned_start
    }

    /// Returns the planned end date.
    #[must_use]
    pub const fn planned_end(&self) -> NaiveDate {
        self.planned_end
    }

    /// Returns the raw active flag.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the activation timestamp.
    #[must_use]
    pub const fn activated_at(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    /// Returns the closing timestamp.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Returns the migration recorded when the sprint closed.
    #[must_use]
    pub const fn closed_with(&self) -> Option<SprintMigration> {
        self.closed_with
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

    /// Derives the lifecycle state from the persisted flags.
    #[must_use]
    pub const fn state(&self) -> SprintState {
        if self.closed_at.is_some() {
            SprintState::Closed
        } else if self.is_active {
            SprintState::Active
        } else {
            SprintState::Planning
        }
    }

    /// Checks that a transition to `target` is allowed without applying it.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidStateTransition`] otherwise.
    pub const fn ensure_can_transition_to(&self, target: SprintState) -> Result<(), SprintDomainError> {
        let from = self.state();
        if from.can_transition_to(target) {
            return Ok(());
        }
        Err(SprintDomainError::InvalidStateTransition {
            sprint_id: self.id,
            from,
            to: target,
        })
    }

    /// Starts the sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidStateTransition`] unless the sprint
    /// is in planning.
    pub fn activate(&mut self, clock: &impl Clock) -> Result<(), SprintDomainError> {
        self.ensure_can_transition_to(SprintState::Active)?;
        let timestamp = clock.utc();
        self.is_active = true;
        self.activated_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Closes the sprint, recording where its pending tasks went.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidStateTransition`] unless the sprint
    /// is active.
    pub fn close(
        &mut self,
        migration: SprintMigration,
        clock: &impl Clock,
    ) -> Result<(), SprintDomainError> {
        self.ensure_can_transition_to(SprintState::Closed)?;
        let timestamp = clock.utc();
        self.is_active = false;
        self.closed_at = Some(timestamp);
        self.closed_with = Some(migration);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Edits name and planned dates.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::ClosedSprintImmutable`] for closed
    /// sprints, and validation errors for a blank name or inverted dates. The
    /// sprint is unchanged on error.
    pub fn apply(&mut self, patch: SprintPatch, clock: &impl Clock) -> Result<(), SprintDomainError> {
        if self.state().is_terminal() {
            return Err(SprintDomainError::ClosedSprintImmutable(self.id));
        }
        let name = patch
            .name
            .map(normalize_name)
            .transpose()?
            .unwrap_or_else(|| self.name.clone());
        let planned_start = patch.planned_start.unwrap_or(self.planned_start);
        let planned_end = patch.planned_end.unwrap_or(self.planned_end);
        validate_dates(planned_start, planned_end)?;

        self.name = name;
        self.planned_start = planned_start;
        self.planned_end = planned_end;
        self.updated_at = clock.utc();
        Ok(())
    }
}

/// Creation payload for a sprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSprint {
    workspace_id: WorkspaceId,
    name: String,
    planned_start: NaiveDate,
    planned_end: NaiveDate,
}

impl NewSprint {
    /// Creates a validated sprint payload.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::EmptyName`] for a blank name and
    /// [`SprintDomainError::InvalidDateRange`] when `planned_end` precedes
    /// `planned_start`.
    pub fn new(
        workspace_id: WorkspaceId,
        name: impl Into<String>,
        planned_start: NaiveDate,
        planned_end: NaiveDate,
    ) -> Result<Self, SprintDomainError> {
        let normalized = normalize_name(name.into())?;
        validate_dates(planned_start, planned_end)?;
        Ok(Self {
            workspace_id,
            name: normalized,
            planned_start,
            planned_end,
        })
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the sprint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Partial update for a sprint's name and planned dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintPatch {
    /// New name.
    pub name: Option<String>,
    /// New planned start date.
    pub planned_start: Option<NaiveDate>,
    /// New planned end date.
    pub planned_end: Option<NaiveDate>,
}

impl SprintPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets new planned dates.
    #[must_use]
    pub const fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.planned_start = Some(start);
        self.planned_end = Some(end);
        self
    }
}

fn normalize_name(raw: String) -> Result<String, SprintDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SprintDomainError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

fn validate_dates(start: NaiveDate, end: NaiveDate) -> Result<(), SprintDomainError> {
    if end < start {
        return Err(SprintDomainError::InvalidDateRange { start, end });
    }
    Ok(())
}
