//! In-memory integration tests for time entry approval.

use super::helpers::{
    TestService, entry_id, monday, project_id, project_with_task, service, task_id, worked_entry,
};
use chrono::TimeDelta;
use eyre::{bail, ensure};
use rstest::rstest;
use worklog::delivery::{
    domain::{DeliveryDomainError, Hours, InvalidStateTransition, Status, ValidationError},
    services::{DeliveryServiceError, StartTimeEntryRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn two_hour_entry_rolls_up_to_task_and_project(service: TestService) -> eyre::Result<()> {
    project_with_task(&service, "proj-1", "task-1").await?;
    let started = service
        .find_project(&project_id("proj-1"))
        .await?
        .ok_or_else(|| eyre::eyre!("project should exist"))?;
    ensure!(started.status() == Status::InProgress);

    let entry = worked_entry(&service, "proj-1", "task-1", "entry-1", 120).await?;
    service.approve_time_entry(entry.id()).await?;

    let Some(project) = service.find_project(&project_id("proj-1")).await? else {
        bail!("project should exist");
    };
    let Some(task) = project.task(&task_id("task-1")) else {
        bail!("task should exist");
    };
    ensure!(task.actual_hours() == Hours::new(2.0)?);
    ensure!(project.actual_hours() == Hours::new(2.0)?);
    ensure!(
        (24.9..=25.1).contains(&task.progress()),
        "task progress was {}",
        task.progress()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hours_only_grow_with_each_approval(service: TestService) -> eyre::Result<()> {
    project_with_task(&service, "proj-1", "task-1").await?;
    let mut previous = Hours::ZERO;
    for (index, minutes) in [30, 45, 90].into_iter().enumerate() {
        let entry =
            worked_entry(&service, "proj-1", "task-1", &format!("entry-{index}"), minutes).await?;
        service.approve_time_entry(entry.id()).await?;
        service.approve_time_entry(entry.id()).await?;

        let Some(project) = service.find_project(&project_id("proj-1")).await? else {
            bail!("project should exist");
        };
        ensure!(project.actual_hours() > previous);
        previous = project.actual_hours();
    }
    ensure!(previous == Hours::new(2.75)?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stopping_before_start_leaves_entry_open(service: TestService) -> eyre::Result<()> {
    project_with_task(&service, "proj-1", "task-1").await?;
    service
        .start_time_entry(
            StartTimeEntryRequest::new("entry-1", "emp-1", "proj-1").with_start_time(monday()),
        )
        .await?;

    let result = service
        .stop_time_entry(&entry_id("entry-1"), monday() - TimeDelta::seconds(1))
        .await;

    ensure!(
        matches!(
            result,
            Err(DeliveryServiceError::Domain(DeliveryDomainError::Validation(
                ValidationError::EndBeforeStart { .. }
            )))
        ),
        "got {result:?}"
    );
    let Some(stored) = service.find_time_entry(&entry_id("entry-1")).await? else {
        bail!("entry should exist");
    };
    ensure!(stored.end_time().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approved_entry_rejects_further_stops(service: TestService) -> eyre::Result<()> {
    project_with_task(&service, "proj-1", "task-1").await?;
    let entry = worked_entry(&service, "proj-1", "task-1", "entry-1", 60).await?;
    service.approve_time_entry(entry.id()).await?;

    let result = service
        .stop_time_entry(entry.id(), monday() + TimeDelta::hours(3))
        .await;

    ensure!(matches!(
        result,
        Err(DeliveryServiceError::Domain(
            DeliveryDomainError::InvalidStateTransition(InvalidStateTransition::EntryLocked(_))
        ))
    ));
    let Some(project) = service.find_project(&project_id("proj-1")).await? else {
        bail!("project should exist");
    };
    ensure!(project.actual_hours() == Hours::new(1.0)?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_level_entries_are_listed_but_not_counted(
    service: TestService,
) -> eyre::Result<()> {
    project_with_task(&service, "proj-1", "task-1").await?;
    let overhead = service
        .start_time_entry(
            StartTimeEntryRequest::new("entry-meeting", "emp-2", "proj-1")
                .with_start_time(monday() + TimeDelta::hours(1))
                .with_description("Planning"),
        )
        .await?;
    service
        .stop_time_entry(overhead.id(), monday() + TimeDelta::hours(2))
        .await?;
    service.approve_time_entry(overhead.id()).await?;
    worked_entry(&service, "proj-1", "task-1", "entry-1", 30).await?;

    let entries = service
        .time_entries_for_project(&project_id("proj-1"))
        .await?;
    let Some(project) = service.find_project(&project_id("proj-1")).await? else {
        bail!("project should exist");
    };

    let ids: Vec<_> = entries.iter().map(|entry| entry.id().as_str()).collect();
    ensure!(ids == ["entry-1", "entry-meeting"], "got {ids:?}");
    ensure!(project.actual_hours() == Hours::ZERO);
    Ok(())
}
