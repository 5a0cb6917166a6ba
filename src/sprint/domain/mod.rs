//! Domain model for sprints.
//!
//! A sprint moves from planning to active to closed. Closing records the
//! migration applied to its unfinished tasks.

mod error;
mod ids;
mod migration;
mod sprint;

pub use error::{ParseSprintStateError, SprintDomainError};
pub use ids::SprintId;
pub use migration::SprintMigration;
pub use sprint::{NewSprint, Sprint, SprintPatch, SprintState};
