//! Application services for the sprint lifecycle.

mod lifecycle;
mod migrator;

pub use lifecycle::{
    PlanSprintRequest, SprintCloseReport, SprintLifecycleError, SprintLifecycleResult,
    SprintLifecycleService,
};
pub use migrator::{
    MigrationError, MigrationPlan, MigrationTargetError, SprintCloseMigrator,
    eligible_destinations, validate_migration_target,
};
