//! Then steps for sprint close BDD scenarios.

use super::world::{SprintCloseWorld, quoted_list, run_async};
use rstest_bdd_macros::then;
use sprintboard::sprint::{domain::SprintState, services::SprintLifecycleError};

fn closing_state(world: &SprintCloseWorld) -> Result<SprintState, eyre::Report> {
    let sprint_id = world.closing()?.id();
    let sprint = run_async(world.service.find(sprint_id))?;
    Ok(sprint.state())
}

#[then("the sprint is closed")]
fn sprint_is_closed(world: &SprintCloseWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_close_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing close result"))?;
    if let Err(err) = result {
        return Err(eyre::eyre!("expected the close to succeed, got {err}"));
    }
    let state = closing_state(world)?;
    eyre::ensure!(
        state == SprintState::Closed,
        "expected closed sprint, found {}",
        state.as_str()
    );
    Ok(())
}

#[then("the sprint is still active")]
fn sprint_is_still_active(world: &SprintCloseWorld) -> Result<(), eyre::Report> {
    let state = closing_state(world)?;
    eyre::ensure!(
        state == SprintState::Active,
        "expected active sprint, found {}",
        state.as_str()
    );
    Ok(())
}

#[then(r#"task "{title}" stays in the closed sprint"#)]
fn task_stays(world: &SprintCloseWorld, title: String) -> Result<(), eyre::Report> {
    let sprint_id = world.closing()?.id();
    let task = world.task_titled(&title)?;
    eyre::ensure!(
        task.sprint_id() == Some(sprint_id),
        "task {title:?} left the closed sprint"
    );
    Ok(())
}

#[then("tasks {titles} are in the backlog")]
fn tasks_in_backlog(world: &SprintCloseWorld, titles: String) -> Result<(), eyre::Report> {
    for title in quoted_list(&titles) {
        let task = world.task_titled(&title)?;
        eyre::ensure!(task.is_in_backlog(), "task {title:?} is not in the backlog");
    }
    Ok(())
}

#[then(r#"tasks {titles} are in sprint "{sprint}""#)]
fn tasks_in_sprint(
    world: &SprintCloseWorld,
    titles: String,
    sprint: String,
) -> Result<(), eyre::Report> {
    let sprint_id = world.sprint_named(&sprint)?.id();
    for title in quoted_list(&titles) {
        let task = world.task_titled(&title)?;
        eyre::ensure!(
            task.sprint_id() == Some(sprint_id),
            "task {title:?} is not in sprint {sprint:?}"
        );
    }
    Ok(())
}

#[then("the close fails with an invalid migration target error")]
fn close_fails_with_invalid_target(world: &SprintCloseWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_close_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing close result"))?;

    if !matches!(result, Err(SprintLifecycleError::InvalidMigrationTarget(_))) {
        return Err(eyre::eyre!(
            "expected InvalidMigrationTarget error, got {result:?}"
        ));
    }

    Ok(())
}

#[then("the close fails with a migration error")]
fn close_fails_with_migration_error(world: &SprintCloseWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_close_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing close result"))?;

    if !matches!(result, Err(SprintLifecycleError::Migration(_))) {
        return Err(eyre::eyre!("expected Migration error, got {result:?}"));
    }

    Ok(())
}
