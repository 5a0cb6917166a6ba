//! Port contracts for workspace configuration.

pub mod repository;

pub use repository::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult};
