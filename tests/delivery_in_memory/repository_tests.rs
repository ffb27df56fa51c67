//! In-memory repository constraint and document shape tests.

use super::helpers::{entry_id, manager, monday, project_id, repo};
use eyre::{bail, ensure};
use rstest::rstest;
use serde_json::json;
use worklog::delivery::{
    adapters::memory::InMemoryDeliveryRepository,
    domain::{EmployeeId, Project, TimeEntry},
    ports::{DeliveryRepository, DeliveryRepositoryError},
};

fn project(raw_id: &str) -> eyre::Result<Project> {
    Ok(Project::new(
        project_id(raw_id),
        "Warehouse rollout",
        None,
        None,
        None,
        Some(manager("mgr-1")),
    )?)
}

fn entry(project: &Project, raw_id: &str) -> eyre::Result<TimeEntry> {
    Ok(TimeEntry::new(
        entry_id(raw_id),
        EmployeeId::new("emp-1")?,
        project,
        None,
        monday(),
    )?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_duplicates(repo: InMemoryDeliveryRepository) -> eyre::Result<()> {
    let stored = project("proj-1")?;
    repo.store_project(&stored).await?;
    let time_entry = entry(&stored, "entry-1")?;
    repo.store_time_entry(&time_entry).await?;

    let duplicate_project = repo.store_project(&stored).await;
    let duplicate_entry = repo.store_time_entry(&time_entry).await;

    ensure!(matches!(
        duplicate_project,
        Err(DeliveryRepositoryError::DuplicateProject(_))
    ));
    ensure!(matches!(
        duplicate_entry,
        Err(DeliveryRepositoryError::DuplicateTimeEntry(_))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updates_require_existing_records(repo: InMemoryDeliveryRepository) -> eyre::Result<()> {
    let missing = project("proj-missing")?;
    let orphan = entry(&missing, "entry-orphan")?;

    ensure!(matches!(
        repo.update_project(&missing).await,
        Err(DeliveryRepositoryError::ProjectNotFound(_))
    ));
    ensure!(matches!(
        repo.update_time_entry(&orphan).await,
        Err(DeliveryRepositoryError::TimeEntryNotFound(_))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn record_approval_writes_nothing_when_entry_is_missing(
    repo: InMemoryDeliveryRepository,
) -> eyre::Result<()> {
    let stored = project("proj-1")?;
    repo.store_project(&stored).await?;
    let mut changed = stored.clone();
    changed.update_actual_hours(3.0)?;
    let orphan = entry(&stored, "entry-orphan")?;

    let result = repo.record_approval(&changed, &orphan).await;

    ensure!(matches!(
        result,
        Err(DeliveryRepositoryError::TimeEntryNotFound(_))
    ));
    let Some(unchanged) = repo.find_project(&project_id("proj-1")).await? else {
        bail!("project should still be stored");
    };
    ensure!(unchanged == stored);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_are_ordered(repo: InMemoryDeliveryRepository) -> eyre::Result<()> {
    for raw_id in ["proj-c", "proj-a", "proj-b"] {
        repo.store_project(&project(raw_id)?).await?;
    }

    let listed = repo.list_projects().await?;

    let ids: Vec<_> = listed.iter().map(|stored| stored.id().as_str()).collect();
    ensure!(ids == ["proj-a", "proj-b", "proj-c"], "got {ids:?}");
    Ok(())
}

#[rstest]
fn project_document_uses_storage_names() -> eyre::Result<()> {
    let mut stored = project("proj-1")?;
    stored.start()?;

    let document = serde_json::to_value(&stored)?;

    ensure!(document["id"] == json!("proj-1"));
    ensure!(document["record"]["status"] == json!("in_progress"));
    ensure!(document["team"][0]["role"] == json!("manager"));
    let restored: Project = serde_json::from_value(document)?;
    ensure!(restored == stored);
    Ok(())
}
