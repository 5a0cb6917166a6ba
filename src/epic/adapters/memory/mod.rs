//! In-memory adapters for epic persistence.

mod epic;

pub use epic::InMemoryEpicRepository;
