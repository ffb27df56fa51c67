//! In-memory repository for delivery tests and embedding.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::delivery::{
    domain::{Project, ProjectId, TimeEntry, TimeEntryId},
    ports::{DeliveryRepository, DeliveryRepositoryError, DeliveryRepositoryResult},
};

/// Thread-safe in-memory delivery repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeliveryRepository {
    state: Arc<RwLock<InMemoryDeliveryState>>,
}

#[derive(Debug, Default)]
struct InMemoryDeliveryState {
    projects: BTreeMap<ProjectId, Project>,
    time_entries: BTreeMap<TimeEntryId, TimeEntry>,
}

impl InMemoryDeliveryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DeliveryRepositoryResult<RwLockReadGuard<'_, InMemoryDeliveryState>> {
        self.state.read().map_err(|err| {
            DeliveryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> DeliveryRepositoryResult<RwLockWriteGuard<'_, InMemoryDeliveryState>> {
        self.state.write().map_err(|err| {
            DeliveryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl DeliveryRepository for InMemoryDeliveryRepository {
    async fn store_project(&self, project: &Project) -> DeliveryRepositoryResult<()> {
        let mut state = self.write()?;
        if state.projects.contains_key(project.id()) {
            return Err(DeliveryRepositoryError::DuplicateProject(
                project.id().clone(),
            ));
        }
        state.projects.insert(project.id().clone(), project.clone());
        Ok(())
    }

    async fn update_project(&self, project: &Project) -> DeliveryRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .projects
            .get_mut(project.id())
            .ok_or_else(|| DeliveryRepositoryError::ProjectNotFound(project.id().clone()))?;
        *stored = project.clone();
        Ok(())
    }

    async fn find_project(&self, id: &ProjectId) -> DeliveryRepositoryResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.projects.get(id).cloned())
    }

    async fn list_projects(&self) -> DeliveryRepositoryResult<Vec<Project>> {
        let state = self.read()?;
        Ok(state.projects.values().cloned().collect())
    }

    async fn store_time_entry(&self, entry: &TimeEntry) -> DeliveryRepositoryResult<()> {
        let mut state = self.write()?;
        if state.time_entries.contains_key(entry.id()) {
            return Err(DeliveryRepositoryError::DuplicateTimeEntry(
                entry.id().clone(),
            ));
        }
        state.time_entries.insert(entry.id().clone(), entry.clone());
        Ok(())
    }

    async fn update_time_entry(&self, entry: &TimeEntry) -> DeliveryRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .time_entries
            .get_mut(entry.id())
            .ok_or_else(|| DeliveryRepositoryError::TimeEntryNotFound(entry.id().clone()))?;
        *stored = entry.clone();
        Ok(())
    }

    async fn find_time_entry(
        &self,
        id: &TimeEntryId,
    ) -> DeliveryRepositoryResult<Option<TimeEntry>> {
        let state = self.read()?;
        Ok(state.time_entries.get(id).cloned())
    }

    async fn find_time_entries_by_project(
        &self,
        project_id: &ProjectId,
    ) -> DeliveryRepositoryResult<Vec<TimeEntry>> {
        let state = self.read()?;
        let mut entries: Vec<TimeEntry> = state
            .time_entries
            .values()
            .filter(|entry| entry.project_id() == project_id)
            .cloned()
            .collect();
        entries.sort_by_key(TimeEntry::start_time);
        Ok(entries)
    }

    async fn record_approval(
        &self,
        project: &Project,
        entry: &TimeEntry,
    ) -> DeliveryRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.projects.contains_key(project.id()) {
            return Err(DeliveryRepositoryError::ProjectNotFound(
                project.id().clone(),
            ));
        }
        if !state.time_entries.contains_key(entry.id()) {
            return Err(DeliveryRepositoryError::TimeEntryNotFound(
                entry.id().clone(),
            ));
        }
        state.projects.insert(project.id().clone(), project.clone());
        state.time_entries.insert(entry.id().clone(), entry.clone());
        Ok(())
    }
}
