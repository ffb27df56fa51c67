//! Time entries: employee work records awaiting or holding approval.

use super::{
    DeliveryDomainError, EmployeeId, Hours, InvalidStateTransition, Project, ProjectId, TaskId,
    TimeEntryId, ValidationError,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A span of work by one employee on a project, optionally on one of its
/// tasks.
///
/// Entries are created when work starts, closed with
/// [`TimeEntry::stop_work`], and become immutable once approved. Approval is
/// the only way hours reach task and project totals, and entries without a
/// task never contribute to any total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    id: TimeEntryId,
    employee_id: EmployeeId,
    project_id: ProjectId,
    task_id: Option<TaskId>,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    description: Option<String>,
    approved: bool,
}

impl TimeEntry {
    /// Opens an entry for `employee_id` on `project`, optionally on one of
    /// its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownTask`] when `task_id` is not part of
    /// `project`.
    pub fn new(
        id: TimeEntryId,
        employee_id: EmployeeId,
        project: &Project,
        task_id: Option<TaskId>,
        start_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if let Some(task) = &task_id {
            if project.task(task).is_none() {
                return Err(ValidationError::UnknownTask {
                    project: project.id().clone(),
                    task: task.clone(),
                });
            }
        }
        Ok(Self {
            id,
            employee_id,
            project_id: project.id().clone(),
            task_id,
            start_time,
            end_time: None,
            description: None,
            approved: false,
        })
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> &TimeEntryId {
        &self.id
    }

    /// Returns the employee who did the work.
    #[must_use]
    pub const fn employee_id(&self) -> &EmployeeId {
        &self.employee_id
    }

    /// Returns the project the work was done for.
    #[must_use]
    pub const fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Returns the task the work was done on, if any.
    #[must_use]
    pub const fn task_id(&self) -> Option<&TaskId> {
        self.task_id.as_ref()
    }

    /// Returns when work began.
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Returns when work stopped, if it has.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns `true` once the entry has been approved.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        self.approved
    }

    /// Records when work stopped, replacing any earlier end time.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EndBeforeStart`] when `end_time` precedes
    /// the start, and [`InvalidStateTransition::EntryLocked`] once approved.
    /// The end time is unchanged on error.
    pub fn stop_work(&mut self, end_time: DateTime<Utc>) -> Result<(), DeliveryDomainError> {
        self.ensure_unlocked()?;
        if end_time < self.start_time {
            return Err(ValidationError::EndBeforeStart {
                start: self.start_time,
                end: end_time,
            }
            .into());
        }
        self.end_time = Some(end_time);
        Ok(())
    }

    /// Returns the time worked, or zero while work is ongoing.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end_time
            .map_or_else(TimeDelta::zero, |end| end - self.start_time)
    }

    /// Returns the time worked in hours, truncated to whole minutes.
    #[must_use]
    pub fn hours(&self) -> Hours {
        Hours::from_duration(self.duration())
    }

    /// Approves the entry and, when it is tied to a task, logs its hours
    /// through `project`.
    ///
    /// Returns `Ok(false)` when the entry was already approved; hours are
    /// only ever counted once.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateTransition::MissingEndTime`] while work is
    /// ongoing and [`ValidationError::EntryProjectMismatch`] when `project`
    /// is not the entry's project. Errors from
    /// [`Project::log_work`] are propagated. The entry stays unapproved on
    /// error.
    pub fn approve(&mut self, project: &mut Project) -> Result<bool, DeliveryDomainError> {
        if self.end_time.is_none() {
            return Err(InvalidStateTransition::MissingEndTime(self.id.clone()).into());
        }
        if self.approved {
            return Ok(false);
        }
        if project.id() != &self.project_id {
            return Err(ValidationError::EntryProjectMismatch {
                entry: self.id.clone(),
                expected: self.project_id.clone(),
                actual: project.id().clone(),
            }
            .into());
        }
        if let Some(task_id) = &self.task_id {
            let approved = Self {
                approved: true,
                ..self.clone()
            };
            project.log_work(task_id, approved)?;
        }
        self.approved = true;
        Ok(true)
    }

    /// Replaces the description.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateTransition::EntryLocked`] once approved.
    pub fn update_description(
        &mut self,
        description: Option<String>,
    ) -> Result<(), InvalidStateTransition> {
        self.ensure_unlocked()?;
        self.description = description;
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<(), InvalidStateTransition> {
        if self.approved {
            return Err(InvalidStateTransition::EntryLocked(self.id.clone()));
        }
        Ok(())
    }
}
