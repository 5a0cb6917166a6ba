//! Error types for workspace configuration and parsing.

use super::StepId;
use thiserror::Error;

/// Configuration errors raised while building a workspace or its pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceDomainError {
    /// The pipeline was configured without any steps.
    #[error("configuration error: a pipeline requires at least one step")]
    EmptyPipeline,

    /// Two pipeline entries share the same order value.
    #[error("configuration error: pipeline order {0} is used by more than one step")]
    DuplicateStepOrder(u32),

    /// The same step appears twice in one pipeline.
    #[error("configuration error: step {0} appears more than once in the pipeline")]
    DuplicateStep(StepId),

    /// The step name is empty after trimming.
    #[error("step name must not be empty")]
    EmptyStepName,

    /// The workspace name is empty after trimming.
    #[error("workspace name must not be empty")]
    EmptyWorkspaceName,
}

impl WorkspaceDomainError {
    /// Returns whether this error describes an invalid pipeline configuration.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPipeline | Self::DuplicateStepOrder(_) | Self::DuplicateStep(_)
        )
    }
}

/// Error returned while parsing a methodology from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown methodology: {0}")]
pub struct ParseMethodologyError(pub String);
