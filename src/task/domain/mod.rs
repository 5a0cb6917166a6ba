//! Domain model for board tasks.
//!
//! Tasks hold their pipeline step, sprint, and epic as mutable references;
//! they do not own the referenced entities.

mod error;
mod ids;
mod task;

pub use error::TaskDomainError;
pub use ids::TaskId;
pub use task::{NewTask, Task, TaskPatch};
