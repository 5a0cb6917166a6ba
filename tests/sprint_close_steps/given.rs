//! Given steps for sprint close BDD scenarios.

use super::world::{SprintCloseWorld, quoted_list, run_async};
use chrono::NaiveDate;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use sprintboard::sprint::services::PlanSprintRequest;
use sprintboard::task::{
    adapters::memory::TaskOperation, domain::NewTask, ports::TaskRepository,
};
use sprintboard::workspace::domain::{Methodology, Step, StepPipeline, Workspace};

fn sprint_dates(offset_weeks: u32) -> Result<(NaiveDate, NaiveDate), eyre::Report> {
    let start = NaiveDate::from_ymd_opt(2026, 9, 1)
        .and_then(|first| first.checked_add_days(chrono::Days::new(u64::from(offset_weeks) * 14)))
        .ok_or_else(|| eyre::eyre!("sprint start out of range"))?;
    let end = start
        .checked_add_days(chrono::Days::new(13))
        .ok_or_else(|| eyre::eyre!("sprint end out of range"))?;
    Ok((start, end))
}

fn plan(world: &mut SprintCloseWorld, name: &str) -> Result<(), eyre::Report> {
    let workspace_id = world.workspace()?.id();
    let offset = u32::try_from(world.sprints.len())?;
    let (start, end) = sprint_dates(offset)?;
    let sprint = run_async(
        world
            .service
            .plan(PlanSprintRequest::new(workspace_id, name, start, end)),
    )
    .wrap_err("plan sprint in scenario setup")?;
    world.sprints.insert(name.to_owned(), sprint);
    Ok(())
}

#[given("a Scrum workspace with steps {names}")]
fn scrum_workspace(world: &mut SprintCloseWorld, names: String) -> Result<(), eyre::Report> {
    let steps = quoted_list(&names)
        .into_iter()
        .map(Step::new)
        .collect::<Result<Vec<_>, _>>()?;
    let workspace = Workspace::new(
        "Scenario board",
        Methodology::Scrum,
        StepPipeline::from_steps(steps)?,
    )?;
    world.workspaces.insert(workspace.clone())?;
    world.workspace = Some(workspace);
    Ok(())
}

#[given(r#"an active sprint "{name}""#)]
fn active_sprint(world: &mut SprintCloseWorld, name: String) -> Result<(), eyre::Report> {
    plan(world, &name)?;
    let sprint_id = world.sprint_named(&name)?.id();
    let activated =
        run_async(world.service.activate(sprint_id)).wrap_err("activate scenario sprint")?;
    world.sprints.insert(name, activated.clone());
    world.closing = Some(activated);
    Ok(())
}

#[given(r#"a planned sprint "{name}""#)]
fn planned_sprint(world: &mut SprintCloseWorld, name: String) -> Result<(), eyre::Report> {
    plan(world, &name)
}

#[given("the sprint holds tasks {titles}")]
fn sprint_holds_tasks(world: &mut SprintCloseWorld, titles: String) -> Result<(), eyre::Report> {
    let workspace = world.workspace()?;
    let workspace_id = workspace.id();
    let entry = workspace.pipeline().entry_step().id();
    let sprint_id = world.closing()?.id();
    for title in quoted_list(&titles) {
        let draft = NewTask::new(workspace_id, entry, title)?.in_sprint(sprint_id);
        run_async(world.tasks.create(draft)).wrap_err("create scenario task")?;
    }
    Ok(())
}

#[given(r#"task "{title}" is in step "{step}""#)]
fn task_in_step(
    world: &mut SprintCloseWorld,
    title: String,
    step: String,
) -> Result<(), eyre::Report> {
    let step_id = world
        .workspace()?
        .pipeline()
        .steps()
        .find(|candidate| candidate.name() == step)
        .map(Step::id)
        .ok_or_else(|| eyre::eyre!("unknown step {step:?}"))?;
    let task = world.task_titled(&title)?;
    run_async(world.tasks.move_to_step(task.id(), step_id)).wrap_err("move scenario task")?;
    Ok(())
}

#[given("the task store fails after {successes:usize} update")]
fn task_store_fails(world: &mut SprintCloseWorld, successes: usize) -> Result<(), eyre::Report> {
    world.tasks.fail_after(TaskOperation::Update, successes)?;
    Ok(())
}
