//! Workspace aggregate and methodology flag.

use super::{ParseMethodologyError, StepPipeline, WorkspaceDomainError, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Working methodology of a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    /// Work is organised in sprints; boards are scoped to one sprint.
    Scrum,
    /// Continuous flow; every task lives directly in the pipeline.
    Kanban,
}

impl Methodology {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scrum => "scrum",
            Self::Kanban => "kanban",
        }
    }

    /// Returns whether sprint semantics apply.
    #[must_use]
    pub const fn uses_sprints(self) -> bool {
        matches!(self, Self::Scrum)
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Methodology {
    type Error = ParseMethodologyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "scrum" => Ok(Self::Scrum),
            "kanban" => Ok(Self::Kanban),
            _ => Err(ParseMethodologyError(value.to_owned())),
        }
    }
}

/// Workspace configuration consumed read-only by the board core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    id: WorkspaceId,
    name: String,
    methodology: Methodology,
    pipeline: StepPipeline,
}

impl Workspace {
    /// Creates a workspace with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyWorkspaceName`] when the name is
    /// blank.
    pub fn new(
        name: impl Into<String>,
        methodology: Methodology,
        pipeline: StepPipeline,
    ) -> Result<Self, WorkspaceDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkspaceDomainError::EmptyWorkspaceName);
        }
        Ok(Self {
            id: WorkspaceId::new(),
            name: trimmed.to_owned(),
            methodology,
            pipeline,
        })
    }

    /// Returns the workspace identifier.
    #[must_use]
    pub const fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Returns the workspace name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configured methodology.
    #[must_use]
    pub const fn methodology(&self) -> Methodology {
        self.methodology
    }

    /// Returns the step pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &StepPipeline {
        &self.pipeline
    }
}
