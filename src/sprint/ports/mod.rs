//! Port contracts for sprint persistence.

pub mod repository;

#[cfg(test)]
pub use repository::MockSprintRepository;
pub use repository::{SprintRepository, SprintRepositoryError, SprintRepositoryResult};
