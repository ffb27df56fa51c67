//! Service layer for project, task and time entry use cases.

use super::{AddTaskRequest, CreateProjectRequest, StartTimeEntryRequest};
use crate::delivery::{
    domain::{
        DeliveryDomainError, EmployeeId, EmployeeRef, InvalidStateTransition, Project, ProjectId,
        Task, TaskId, TemporalEntity, TimeEntry, TimeEntryId, Transition, ValidationError,
    },
    ports::{DeliveryRepository, DeliveryRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

/// Service-level errors for delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryServiceError {
    /// A domain rule rejected the request.
    #[error(transparent)]
    Domain(#[from] DeliveryDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] DeliveryRepositoryError),
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// The time entry does not exist.
    #[error("time entry not found: {0}")]
    TimeEntryNotFound(TimeEntryId),
}

impl From<ValidationError> for DeliveryServiceError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<InvalidStateTransition> for DeliveryServiceError {
    fn from(err: InvalidStateTransition) -> Self {
        Self::Domain(err.into())
    }
}

/// Result type for delivery service operations.
pub type DeliveryServiceResult<T> = Result<T, DeliveryServiceError>;

type ProjectLocks = Mutex<HashMap<ProjectId, Arc<Mutex<()>>>>;

/// Delivery orchestration service.
///
/// Every mutation of a project, or of a time entry belonging to it, runs
/// under that project's lock: load, apply domain rules, write back. Work on
/// different projects proceeds independently.
#[derive(Clone)]
pub struct DeliveryService<R, C>
where
    R: DeliveryRepository,
    C: Clock + Send + Sync,
{
    pub(super) repository: Arc<R>,
    clock: Arc<C>,
    project_locks: Arc<ProjectLocks>,
}

impl<R, C> DeliveryService<R, C>
where
    R: DeliveryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new delivery service.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            project_locks: Arc::default(),
        }
    }

    /// Creates and stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryServiceError`] when validation fails or the
    /// repository rejects the project.
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> DeliveryServiceResult<Project> {
        let CreateProjectRequest {
            project_id,
            title,
            description,
            start_date,
            due_date,
            owner,
            estimated_hours,
        } = request;

        let mut project = Project::new(
            ProjectId::new(project_id)?,
            title,
            description,
            start_date,
            due_date,
            owner,
        )?;
        if let Some(hours) = estimated_hours {
            project.set_estimated_hours(hours)?;
        }

        self.repository.store_project(&project).await?;
        info!(project_id = %project.id(), title = project.title(), "project created");
        Ok(project)
    }

    /// Creates a task and appends it to its project.
    ///
    /// A new project moves to in progress, taking its new tasks with it.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryServiceError::ProjectNotFound`] for an unknown
    /// project, or a domain or repository error.
    pub async fn add_task(&self, request: AddTaskRequest) -> DeliveryServiceResult<Task> {
        let AddTaskRequest {
            project_id: raw_project_id,
            task_id: raw_task_id,
            title,
            assignee,
            due_date,
            estimated_hours,
            priority,
        } = request;
        let project_id = ProjectId::new(raw_project_id)?;
        let task_id = TaskId::new(raw_task_id)?;

        let _guard = self.lock_project(&project_id).await;
        let mut project = self.load_project(&project_id).await?;
        let new_task = Task::new(
            task_id.clone(),
            title,
            &project,
            assignee,
            due_date,
            &*self.clock,
        )?;
        project
            .add_task(new_task)
            .inspect_err(|err| log_rejection("add_task", err))?;

        let mut added = project
            .task_mut(&task_id)
            .ok_or_else(|| ValidationError::UnknownTask {
                project: project_id.clone(),
                task: task_id.clone(),
            })?;
        if let Some(hours) = estimated_hours {
            added.set_estimated_hours(hours)?;
        }
        added.set_priority(priority);
        let task = Task::clone(&added);

        self.repository.update_project(&project).await?;
        info!(
            project_id = %project_id,
            task_id = %task_id,
            project_status = %project.status(),
            "task added"
        );
        Ok(task)
    }

    /// Adds an employee to a project's team.
    ///
    /// Returns whether the roster changed.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryServiceError::ProjectNotFound`] for an unknown
    /// project, or a repository error.
    pub async fn add_team_member(
        &self,
        project_id: &ProjectId,
        member: EmployeeRef,
    ) -> DeliveryServiceResult<bool> {
        let _guard = self.lock_project(project_id).await;
        let mut project = self.load_project(project_id).await?;
        let employee_id = member.id().clone();
        let added = project.add_team_member(member);
        if added {
            self.repository.update_project(&project).await?;
        }
        debug!(project_id = %project_id, employee_id = %employee_id, added, "team member");
        Ok(added)
    }

    /// Applies a status transition to a project.
    ///
    /// A transition whose guard does not match is a no-op; inspect the
    /// returned project's status to see the effect.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryServiceError::ProjectNotFound`] for an unknown
    /// project, [`InvalidStateTransition::UnfinishedTasks`] when completing
    /// a project with open tasks, or a repository error.
    pub async fn transition_project(
        &self,
        project_id: &ProjectId,
        transition: Transition,
    ) -> DeliveryServiceResult<Project> {
        let _guard = self.lock_project(project_id).await;
        let mut project = self.load_project(project_id).await?;
        let applied = project
            .apply_transition(transition, &())
            .inspect_err(|err| log_rejection("transition_project", err))?;
        debug!(
            project_id = %project_id,
            ?transition,
            applied,
            status = %project.status(),
            "project transition"
        );
        if applied {
            self.repository.update_project(&project).await?;
        }
        Ok(project)
    }

    /// Applies a status transition to one task of a project.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryServiceError::ProjectNotFound`] for an unknown
    /// project, [`ValidationError::UnknownTask`] for an unknown task, a date
    /// validation error when completing a task that escapes its project's
    /// window, or a repository error.
    pub async fn transition_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
        transition: Transition,
    ) -> DeliveryServiceResult<Task> {
        let _guard = self.lock_project(project_id).await;
        let mut project = self.load_project(project_id).await?;
        let mut task = project
            .task_mut(task_id)
            .ok_or_else(|| ValidationError::UnknownTask {
                project: project_id.clone(),
                task: task_id.clone(),
            })?;
        let applied = task
            .apply(transition)
            .inspect_err(|err| log_rejection("transition_task", err))?;
        let updated = Task::clone(&task);
        debug!(
            project_id = %project_id,
            task_id = %task_id,
            ?transition,
            applied,
            status = %updated.status(),
            "task transition"
        );
        if applied {
            self.repository.update_project(&project).await?;
        }
        Ok(updated)
    }

    /// Opens and stores a time entry.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryServiceError::ProjectNotFound`] for an unknown
    /// project, [`ValidationError::UnknownTask`] when the task is not part
    /// of the project, or a repository error.
    pub async fn start_time_entry(
        &self,
        request: StartTimeEntryRequest,
    ) -> DeliveryServiceResult<TimeEntry> {
        let StartTimeEntryRequest {
            entry_id: raw_entry_id,
            employee_id: raw_employee_id,
            project_id: raw_project_id,
            task_id: raw_task_id,
            start_time: requested_start,
            description,
        } = request;
        let entry_id = TimeEntryId::new(raw_entry_id)?;
        let employee_id = EmployeeId::new(raw_employee_id)?;
        let project_id = ProjectId::new(raw_project_id)?;
        let task_id = raw_task_id.map(TaskId::new).transpose()?;

        let _guard = self.lock_project(&project_id).await;
        let project = self.load_project(&project_id).await?;
        let start_time = requested_start.unwrap_or_else(|| self.clock.utc());
        let mut entry = TimeEntry::new(entry_id, employee_id, &project, task_id, start_time)?;
        if description.is_some() {
            entry.update_description(description)?;
        }

        self.repository.store_time_entry(&entry).await?;
        info!(
            entry_id = %entry.id(),
            project_id = %project_id,
            employee_id = %entry.employee_id(),
            "time entry started"
        );
        Ok(entry)
    }

    /// Records when work on an entry stopped.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryServiceError::TimeEntryNotFound`] for an unknown
    /// entry, [`ValidationError::EndBeforeStart`] for an end before the
    /// start, [`InvalidStateTransition::EntryLocked`] for approved entries,
    /// or a repository error.
    pub async fn stop_time_entry(
        &self,
        entry_id: &TimeEntryId,
        end_time: DateTime<Utc>,
    ) -> DeliveryServiceResult<TimeEntry> {
        let (_guard, mut entry) = self.lock_time_entry(entry_id).await?;
        entry
            .stop_work(end_time)
            .inspect_err(|err| log_rejection("stop_time_entry", err))?;
        self.repository.update_time_entry(&entry).await?;
        debug!(entry_id = %entry_id, hours = entry.hours().value(), "time entry stopped");
        Ok(entry)
    }

    /// Approves an entry and rolls its hours into its task and project.
    ///
    /// Approving an approved entry changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryServiceError::TimeEntryNotFound`] for an unknown
    /// entry, [`InvalidStateTransition::MissingEndTime`] while work is
    /// ongoing, or a repository error.
    pub async fn approve_time_entry(
        &self,
        entry_id: &TimeEntryId,
    ) -> DeliveryServiceResult<TimeEntry> {
        let (_guard, mut entry) = self.lock_time_entry(entry_id).await?;
        let mut project = self.load_project(entry.project_id()).await?;
        let approved = entry
            .approve(&mut project)
            .inspect_err(|err| log_rejection("approve_time_entry", err))?;
        if !approved {
            debug!(entry_id = %entry_id, "time entry already approved");
            return Ok(entry);
        }

        self.repository.record_approval(&project, &entry).await?;
        info!(
            entry_id = %entry_id,
            project_id = %project.id(),
            hours = entry.hours().value(),
            project_hours = project.actual_hours().value(),
            "time entry approved"
        );
        Ok(entry)
    }

    /// Replaces the description of an unapproved entry.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryServiceError::TimeEntryNotFound`] for an unknown
    /// entry, [`InvalidStateTransition::EntryLocked`] once approved, or a
    /// repository error.
    pub async fn update_time_entry_description(
        &self,
        entry_id: &TimeEntryId,
        description: Option<String>,
    ) -> DeliveryServiceResult<TimeEntry> {
        let (_guard, mut entry) = self.lock_time_entry(entry_id).await?;
        entry
            .update_description(description)
            .map_err(DeliveryDomainError::from)
            .inspect_err(|err| log_rejection("update_time_entry_description", err))?;
        self.repository.update_time_entry(&entry).await?;
        Ok(entry)
    }

    pub(super) async fn load_project(&self, id: &ProjectId) -> DeliveryServiceResult<Project> {
        self.repository
            .find_project(id)
            .await?
            .ok_or_else(|| DeliveryServiceError::ProjectNotFound(id.clone()))
    }

    async fn load_time_entry(&self, id: &TimeEntryId) -> DeliveryServiceResult<TimeEntry> {
        self.repository
            .find_time_entry(id)
            .await?
            .ok_or_else(|| DeliveryServiceError::TimeEntryNotFound(id.clone()))
    }

    /// Acquires the lock for `id`.
    ///
    /// Locks referenced only by the map have no holder and no waiter, so
    /// they are dropped here; the map tracks projects with work in flight.
    async fn lock_project(&self, id: &ProjectId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.project_locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(id.clone()).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    pub(crate) async fn tracked_project_locks(&self) -> usize {
        self.project_locks.lock().await.len()
    }

    /// Locks the entry's project, then reads the entry again under the lock.
    async fn lock_time_entry(
        &self,
        id: &TimeEntryId,
    ) -> DeliveryServiceResult<(OwnedMutexGuard<()>, TimeEntry)> {
        let project_id = self.load_time_entry(id).await?.project_id().clone();
        let guard = self.lock_project(&project_id).await;
        let entry = self.load_time_entry(id).await?;
        Ok((guard, entry))
    }
}

fn log_rejection(operation: &str, err: &DeliveryDomainError) {
    warn!(operation, error = %err, "delivery rule rejected request");
}
