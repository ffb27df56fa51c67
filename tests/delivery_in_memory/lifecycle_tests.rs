//! In-memory integration tests for project and task status cascades.

use super::helpers::{TestService, monday, project_id, project_with_task, service, task_id};
use chrono::TimeDelta;
use eyre::{bail, ensure};
use rstest::rstest;
use worklog::delivery::{
    domain::{DeliveryDomainError, InvalidStateTransition, Status, Transition},
    services::{AddTaskRequest, CreateProjectRequest, DeliveryServiceError},
};

#[rstest]
#[case(Transition::Hold, Status::OnHold)]
#[case(Transition::Cancel, Status::Cancelled)]
#[case(Transition::Start, Status::InProgress)]
#[tokio::test(flavor = "multi_thread")]
async fn project_transitions_from_in_progress(
    service: TestService,
    #[case] transition: Transition,
    #[case] expected: Status,
) -> eyre::Result<()> {
    project_with_task(&service, "proj-1", "task-1").await?;

    let project = service
        .transition_project(&project_id("proj-1"), transition)
        .await?;

    ensure!(project.status() == expected, "got {}", project.status());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_project_cancels_every_open_task(service: TestService) -> eyre::Result<()> {
    project_with_task(&service, "proj-1", "task-1").await?;
    service
        .add_task(AddTaskRequest::new("proj-1", "task-2", "Label printers"))
        .await?;
    service
        .transition_task(&project_id("proj-1"), &task_id("task-2"), Transition::Hold)
        .await?;

    service
        .transition_project(&project_id("proj-1"), Transition::Cancel)
        .await?;

    let Some(project) = service.find_project(&project_id("proj-1")).await? else {
        bail!("project should exist");
    };
    ensure!(project.status() == Status::Cancelled);
    ensure!(
        project
            .tasks()
            .iter()
            .all(|task| task.status() == Status::Cancelled)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_completes_only_after_its_tasks(service: TestService) -> eyre::Result<()> {
    project_with_task(&service, "proj-1", "task-1").await?;

    let premature = service
        .transition_project(&project_id("proj-1"), Transition::Complete)
        .await;
    ensure!(matches!(
        premature,
        Err(DeliveryServiceError::Domain(
            DeliveryDomainError::InvalidStateTransition(
                InvalidStateTransition::UnfinishedTasks { .. }
            )
        ))
    ));

    service
        .transition_task(&project_id("proj-1"), &task_id("task-1"), Transition::Complete)
        .await?;
    let project = service
        .transition_project(&project_id("proj-1"), Transition::Complete)
        .await?;
    ensure!(project.status() == Status::Completed);

    let cancelled = service
        .transition_project(&project_id("proj-1"), Transition::Cancel)
        .await?;
    ensure!(cancelled.status() == Status::Completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_due_after_project_cannot_complete(service: TestService) -> eyre::Result<()> {
    let kickoff = monday();
    service
        .create_project(
            CreateProjectRequest::new("proj-1", "Short sprint")
                .with_start_date(kickoff)
                .with_due_date(kickoff + TimeDelta::days(3)),
        )
        .await?;
    service
        .add_task(
            AddTaskRequest::new("proj-1", "task-1", "Overrun")
                .with_due_date(kickoff + TimeDelta::days(10)),
        )
        .await?;

    let result = service
        .transition_task(&project_id("proj-1"), &task_id("task-1"), Transition::Complete)
        .await;

    ensure!(
        matches!(
            result,
            Err(DeliveryServiceError::Domain(DeliveryDomainError::Validation(_)))
        ),
        "got {result:?}"
    );
    let Some(project) = service.find_project(&project_id("proj-1")).await? else {
        bail!("project should exist");
    };
    let Some(task) = project.task(&task_id("task-1")) else {
        bail!("task should exist");
    };
    ensure!(task.status() == Status::InProgress);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_transition_is_rejected(service: TestService) -> eyre::Result<()> {
    project_with_task(&service, "proj-1", "task-1").await?;

    let result = service
        .transition_task(&project_id("proj-1"), &task_id("task-9"), Transition::Start)
        .await;

    ensure!(result.is_err_and(|err| matches!(
        err,
        DeliveryServiceError::Domain(domain) if domain.is_validation()
    )));
    Ok(())
}
