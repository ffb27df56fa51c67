//! Then steps for time approval BDD scenarios.

use super::world::{ApprovalWorld, run_async};
use chrono::TimeDelta;
use rstest_bdd_macros::then;
use worklog::delivery::{
    domain::{DeliveryDomainError, Hours, InvalidStateTransition, Status},
    services::DeliveryServiceError,
};

#[then("the task and project each have {minutes:i64} approved minutes")]
fn approved_minutes(world: &ApprovalWorld, minutes: i64) -> Result<(), eyre::Report> {
    let expected = Hours::from_duration(TimeDelta::minutes(minutes));
    let project = run_async(world.service.find_project(world.project_id()?))?
        .ok_or_else(|| eyre::eyre!("project missing from repository"))?;
    let task_id = world
        .task_id
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let task = project
        .task(task_id)
        .ok_or_else(|| eyre::eyre!("task missing from project"))?;

    if task.actual_hours() != expected || project.actual_hours() != expected {
        return Err(eyre::eyre!(
            "expected {expected} on both, task has {}, project has {}",
            task.actual_hours(),
            project.actual_hours()
        ));
    }
    Ok(())
}

#[then(r#"the project status is "{status}""#)]
fn project_status_is(world: &ApprovalWorld, status: String) -> Result<(), eyre::Report> {
    let expected = Status::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let project = run_async(world.service.find_project(world.project_id()?))?
        .ok_or_else(|| eyre::eyre!("project missing from repository"))?;

    if project.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            project.status()
        ));
    }
    Ok(())
}

#[then("the request fails because the entry has no end time")]
fn request_fails_missing_end_time(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result"))?;

    if !matches!(
        result,
        Err(DeliveryServiceError::Domain(
            DeliveryDomainError::InvalidStateTransition(InvalidStateTransition::MissingEndTime(_))
        ))
    ) {
        return Err(eyre::eyre!("expected MissingEndTime error, got {result:?}"));
    }
    Ok(())
}

#[then("the request fails because the entry is locked")]
fn request_fails_entry_locked(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result"))?;

    if !matches!(
        result,
        Err(DeliveryServiceError::Domain(
            DeliveryDomainError::InvalidStateTransition(InvalidStateTransition::EntryLocked(_))
        ))
    ) {
        return Err(eyre::eyre!("expected EntryLocked error, got {result:?}"));
    }
    Ok(())
}
