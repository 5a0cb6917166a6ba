//! When steps for sprint close BDD scenarios.

use super::world::{SprintCloseWorld, run_async};
use rstest_bdd_macros::when;
use sprintboard::sprint::domain::SprintMigration;

fn close(world: &mut SprintCloseWorld, migration: SprintMigration) -> Result<(), eyre::Report> {
    let sprint_id = world.closing()?.id();
    let result = run_async(world.service.close(sprint_id, migration));
    world.last_close_result = Some(result);
    Ok(())
}

#[when("the sprint is closed into the backlog")]
fn close_into_backlog(world: &mut SprintCloseWorld) -> Result<(), eyre::Report> {
    close(world, SprintMigration::Backlog)
}

#[when(r#"the sprint is closed into "{target}""#)]
fn close_into_sprint(world: &mut SprintCloseWorld, target: String) -> Result<(), eyre::Report> {
    let target_id = world.sprint_named(&target)?.id();
    close(world, SprintMigration::to_sprint(target_id))
}
