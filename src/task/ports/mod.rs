//! Port contracts for task persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;

#[cfg(test)]
pub use repository::MockTaskRepository;
pub use repository::{
    SprintScope, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
};
