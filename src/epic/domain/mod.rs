//! Domain model for epics and their task associations.

mod epic;
mod error;
mod ids;

pub use epic::Epic;
pub use error::{EpicDomainError, EpicGuardError};
pub use ids::EpicId;
