//! Port contracts for epic persistence.

pub mod repository;

pub use repository::{EpicRepository, EpicRepositoryError, EpicRepositoryResult};
