//! Given steps for time approval BDD scenarios.

use super::world::{ApprovalWorld, run_async};
use chrono::TimeDelta;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use worklog::delivery::{
    domain::{ProjectId, TaskId},
    services::{AddTaskRequest, CreateProjectRequest, StartTimeEntryRequest},
};

#[given("an undated project with a task due in {days:i64} days")]
fn undated_project_with_task(world: &mut ApprovalWorld, days: i64) -> Result<(), eyre::Report> {
    let project = run_async(
        world
            .service
            .create_project(CreateProjectRequest::new("proj-bdd", "Support rota")),
    )
    .wrap_err("create project for approval scenario")?;
    let task = run_async(world.service.add_task(
        AddTaskRequest::new("proj-bdd", "task-bdd", "Triage queue")
            .with_due_date(world.now + TimeDelta::days(days)),
    ))
    .wrap_err("add task for approval scenario")?;

    world.project_id = Some(ProjectId::clone(project.id()));
    world.task_id = Some(TaskId::clone(task.id()));
    Ok(())
}

#[given("a finished entry of {minutes:i64} minutes on that task")]
fn finished_entry(world: &mut ApprovalWorld, minutes: i64) -> Result<(), eyre::Report> {
    start_entry(world)?;
    let entry = world.entry()?;
    let end = entry.start_time() + TimeDelta::minutes(minutes);
    let stopped = run_async(world.service.stop_time_entry(entry.id(), end))
        .wrap_err("stop entry for approval scenario")?;
    world.entry = Some(stopped);
    Ok(())
}

#[given("an open entry on that task")]
fn open_entry(world: &mut ApprovalWorld) -> Result<(), eyre::Report> {
    start_entry(world)
}

#[given("the entry has been approved")]
fn entry_has_been_approved(world: &mut ApprovalWorld) -> Result<(), eyre::Report> {
    let entry_id = world.entry()?.id().clone();
    let approved = run_async(world.service.approve_time_entry(&entry_id))
        .wrap_err("approve entry in scenario setup")?;
    world.entry = Some(approved);
    Ok(())
}

fn start_entry(world: &mut ApprovalWorld) -> Result<(), eyre::Report> {
    let project_id = world.project_id()?.as_str().to_owned();
    let task_id = world
        .task_id
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?
        .as_str()
        .to_owned();
    let started = run_async(world.service.start_time_entry(
        StartTimeEntryRequest::new("entry-bdd", "emp-bdd", project_id).with_task(task_id),
    ))
    .wrap_err("start entry for approval scenario")?;
    world.entry = Some(started);
    Ok(())
}
