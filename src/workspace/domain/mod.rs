//! Domain model for workspaces and their step pipelines.
//!
//! Pipelines are configured outside the board core; this domain only
//! validates and exposes them.

mod error;
mod ids;
mod pipeline;
mod workspace;

pub use error::{ParseMethodologyError, WorkspaceDomainError};
pub use ids::{StepId, WorkspaceId};
pub use pipeline::{Column, PipelineEntry, Step, StepPipeline};
pub use workspace::{Methodology, Workspace};
