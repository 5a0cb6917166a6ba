//! Application services for epics.

mod epics;
mod guard;

pub use epics::{EpicService, EpicServiceError, EpicServiceResult};
pub use guard::EpicAssociationGuard;
