//! Repository port for projects and time entries.

use crate::delivery::domain::{Project, ProjectId, TimeEntry, TimeEntryId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for delivery repository operations.
pub type DeliveryRepositoryResult<T> = Result<T, DeliveryRepositoryError>;

/// Storage contract for project aggregates and their time entries.
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryRepositoryError::DuplicateProject`] when the
    /// identifier is taken.
    async fn store_project(&self, project: &Project) -> DeliveryRepositoryResult<()>;

    /// Replaces an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryRepositoryError::ProjectNotFound`] when the project
    /// does not exist.
    async fn update_project(&self, project: &Project) -> DeliveryRepositoryResult<()>;

    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_project(&self, id: &ProjectId) -> DeliveryRepositoryResult<Option<Project>>;

    /// Returns every project ordered by identifier.
    async fn list_projects(&self) -> DeliveryRepositoryResult<Vec<Project>>;

    /// Stores a new time entry.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryRepositoryError::DuplicateTimeEntry`] when the
    /// identifier is taken.
    async fn store_time_entry(&self, entry: &TimeEntry) -> DeliveryRepositoryResult<()>;

    /// Replaces an existing time entry.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryRepositoryError::TimeEntryNotFound`] when the entry
    /// does not exist.
    async fn update_time_entry(&self, entry: &TimeEntry) -> DeliveryRepositoryResult<()>;

    /// Finds a time entry by identifier.
    ///
    /// Returns `None` when the entry does not exist.
    async fn find_time_entry(
        &self,
        id: &TimeEntryId,
    ) -> DeliveryRepositoryResult<Option<TimeEntry>>;

    /// Returns every entry recorded for a project, ordered by start time.
    async fn find_time_entries_by_project(
        &self,
        project_id: &ProjectId,
    ) -> DeliveryRepositoryResult<Vec<TimeEntry>>;

    /// Writes an approved entry together with the project it updated.
    ///
    /// Either both writes happen or neither does.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryRepositoryError::ProjectNotFound`] or
    /// [`DeliveryRepositoryError::TimeEntryNotFound`] when either record is
    /// missing.
    async fn record_approval(
        &self,
        project: &Project,
        entry: &TimeEntry,
    ) -> DeliveryRepositoryResult<()>;
}

/// Errors returned by delivery repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DeliveryRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// A time entry with the same identifier already exists.
    #[error("duplicate time entry identifier: {0}")]
    DuplicateTimeEntry(TimeEntryId),

    /// The project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The time entry was not found.
    #[error("time entry not found: {0}")]
    TimeEntryNotFound(TimeEntryId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DeliveryRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
