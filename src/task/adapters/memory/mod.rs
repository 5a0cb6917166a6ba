//! In-memory adapters for task persistence.

mod task;

pub use task::{InMemoryTaskRepository, TaskOperation};
