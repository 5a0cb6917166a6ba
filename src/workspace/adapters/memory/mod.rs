//! In-memory adapters for workspace configuration.

mod workspace;

pub use workspace::InMemoryWorkspaceRepository;
