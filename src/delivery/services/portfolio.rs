//! Read-only lookups and portfolio-wide aggregates.

use super::{DeliveryService, DeliveryServiceResult};
use crate::delivery::{
    domain::{EmployeeId, Hours, Project, ProjectId, Status, TimeEntry, TimeEntryId},
    ports::DeliveryRepository,
};
use mockable::Clock;
use std::collections::BTreeMap;

impl<R, C> DeliveryService<R, C>
where
    R: DeliveryRepository,
    C: Clock + Send + Sync,
{
    /// Finds a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`super::DeliveryServiceError::Repository`] when lookup fails.
    pub async fn find_project(&self, id: &ProjectId) -> DeliveryServiceResult<Option<Project>> {
        Ok(self.repository.find_project(id).await?)
    }

    /// Finds a time entry by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`super::DeliveryServiceError::Repository`] when lookup fails.
    pub async fn find_time_entry(
        &self,
        id: &TimeEntryId,
    ) -> DeliveryServiceResult<Option<TimeEntry>> {
        Ok(self.repository.find_time_entry(id).await?)
    }

    /// Returns every entry recorded for a project, approved or not.
    ///
    /// # Errors
    ///
    /// Returns [`super::DeliveryServiceError::ProjectNotFound`] for an
    /// unknown project or a repository error.
    pub async fn time_entries_for_project(
        &self,
        project_id: &ProjectId,
    ) -> DeliveryServiceResult<Vec<TimeEntry>> {
        self.load_project(project_id).await?;
        Ok(self
            .repository
            .find_time_entries_by_project(project_id)
            .await?)
    }

    /// Returns the projects currently in progress.
    ///
    /// # Errors
    ///
    /// Returns [`super::DeliveryServiceError::Repository`] when listing fails.
    pub async fn active_projects(&self) -> DeliveryServiceResult<Vec<Project>> {
        let projects = self.repository.list_projects().await?;
        Ok(projects
            .into_iter()
            .filter(|project| project.status() == Status::InProgress)
            .collect())
    }

    /// Returns the projects owned by an employee.
    ///
    /// # Errors
    ///
    /// Returns [`super::DeliveryServiceError::Repository`] when listing fails.
    pub async fn projects_owned_by(
        &self,
        employee_id: &EmployeeId,
    ) -> DeliveryServiceResult<Vec<Project>> {
        let projects = self.repository.list_projects().await?;
        Ok(projects
            .into_iter()
            .filter(|project| project.owner().is_some_and(|owner| owner.id() == employee_id))
            .collect())
    }

    /// Returns the actual hours summed over every project.
    ///
    /// # Errors
    ///
    /// Returns [`super::DeliveryServiceError::Repository`] when listing fails.
    pub async fn total_actual_hours(&self) -> DeliveryServiceResult<Hours> {
        let projects = self.repository.list_projects().await?;
        Ok(projects
            .iter()
            .map(Project::actual_hours)
            .fold(Hours::ZERO, |total, hours| total + hours))
    }

    /// Returns each project's progress percentage.
    ///
    /// # Errors
    ///
    /// Returns [`super::DeliveryServiceError::Repository`] when listing fails.
    pub async fn progress_by_project(&self) -> DeliveryServiceResult<BTreeMap<ProjectId, f64>> {
        let projects = self.repository.list_projects().await?;
        Ok(projects
            .iter()
            .map(|project| (project.id().clone(), project.progress()))
            .collect())
    }
}
