//! Tasks: dated work items nested inside a project.

use super::{
    DateWindow, DeliveryDomainError, EmployeeRef, Hours, InvalidStateTransition, Project,
    ProjectId, Status, TaskId, TaskPriority, TemporalEntity, TemporalRecord, TimeEntry,
    Transition, ValidationError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A unit of work bound to exactly one project.
///
/// Tasks are owned by their project. Read access goes through
/// [`Project::tasks`] and [`Project::task`]; mutation goes through
/// [`Project::task_mut`], which hands the task its project's current date
/// window so nesting rules always see fresh bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    record: TemporalRecord,
    time_entries: Vec<TimeEntry>,
    estimated_hours: Hours,
    actual_hours: Hours,
    priority: TaskPriority,
}

impl Task {
    /// Creates a task for `project`, starting now and due at `due_date`.
    ///
    /// The task is not attached to the project until passed to
    /// [`Project::add_task`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] for a blank title or
    /// [`ValidationError::DueBeforeStart`] when `due_date` is in the past.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        project: &Project,
        assignee: Option<EmployeeRef>,
        due_date: Option<DateTime<Utc>>,
        clock: &impl Clock,
    ) -> Result<Self, ValidationError> {
        let window = DateWindow::new(Some(clock.utc()), due_date);
        let record = TemporalRecord::new(title, None, window, assignee)?;
        Ok(Self {
            id,
            project_id: project.id().clone(),
            record,
            time_entries: Vec::new(),
            estimated_hours: Hours::ZERO,
            actual_hours: Hours::ZERO,
            priority: TaskPriority::default(),
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the identifier of the owning project.
    #[must_use]
    pub const fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.record.title()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.record.description()
    }

    /// Returns the start date.
    #[must_use]
    pub const fn start_date(&self) -> Option<DateTime<Utc>> {
        self.record.start_date()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.record.due_date()
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<&EmployeeRef> {
        self.record.owner()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.record.status()
    }

    /// Returns the approved entries logged against this task, oldest first.
    #[must_use]
    pub fn time_entries(&self) -> &[TimeEntry] {
        &self.time_entries
    }

    /// Returns the estimated effort.
    #[must_use]
    pub const fn estimated_hours(&self) -> Hours {
        self.estimated_hours
    }

    /// Returns the sum of approved hours logged against this task.
    #[must_use]
    pub const fn actual_hours(&self) -> Hours {
        self.actual_hours
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns actual hours as a percentage of the estimate, or zero without
    /// an estimate.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.actual_hours.percent_of(self.estimated_hours)
    }

    /// Appends an approved entry and adds its hours to this task.
    ///
    /// Forwarding the hours to the project is the caller's job.
    pub(crate) fn record_work(&mut self, entry: TimeEntry) -> Result<Hours, DeliveryDomainError> {
        if entry.task_id() != Some(&self.id) {
            return Err(ValidationError::EntryForDifferentTask {
                entry: entry.id().clone(),
                task: self.id.clone(),
            }
            .into());
        }
        if entry.project_id() != &self.project_id {
            return Err(ValidationError::EntryProjectMismatch {
                entry: entry.id().clone(),
                expected: entry.project_id().clone(),
                actual: self.project_id.clone(),
            }
            .into());
        }
        if !entry.is_approved() {
            return Err(InvalidStateTransition::EntryNotApproved(entry.id().clone()).into());
        }
        if self
            .time_entries
            .iter()
            .any(|logged| logged.id() == entry.id())
        {
            return Err(ValidationError::DuplicateEntry(entry.id().clone()).into());
        }
        let hours = entry.hours();
        self.time_entries.push(entry);
        self.actual_hours += hours;
        Ok(hours)
    }
}

impl TemporalEntity for Task {
    type Scope = DateWindow;

    fn record(&self) -> &TemporalRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut TemporalRecord {
        &mut self.record
    }

    fn validate_dates(&self, project: &DateWindow) -> Result<(), ValidationError> {
        self.record.window().validate()?;
        if let (Some(project_start), Some(task_start)) = (project.start(), self.start_date()) {
            if task_start < project_start {
                return Err(ValidationError::TaskStartsBeforeProject {
                    task: self.id.clone(),
                    task_start,
                    project_start,
                });
            }
        }
        if let (Some(project_due), Some(task_due)) = (project.due(), self.due_date()) {
            if task_due > project_due {
                return Err(ValidationError::TaskDueAfterProject {
                    task: self.id.clone(),
                    task_due,
                    project_due,
                });
            }
        }
        Ok(())
    }

    fn check_status_change(
        &self,
        next: Status,
        project: &DateWindow,
    ) -> Result<(), DeliveryDomainError> {
        if next == Status::Completed {
            self.validate_dates(project)?;
        }
        Ok(())
    }
}

/// Mutable access to a task within its project.
///
/// Obtained from [`Project::task_mut`]; dereferences to [`Task`] for reads.
#[derive(Debug)]
pub struct TaskMut<'a> {
    task: &'a mut Task,
    project_window: DateWindow,
}

impl<'a> TaskMut<'a> {
    pub(crate) const fn new(task: &'a mut Task, project_window: DateWindow) -> Self {
        Self {
            task,
            project_window,
        }
    }

    /// Applies `transition` within the project's window.
    ///
    /// # Errors
    ///
    /// Returns the gate's error with the status unchanged, or a cascade
    /// error from the hook.
    pub fn apply(&mut self, transition: Transition) -> Result<bool, DeliveryDomainError> {
        self.task.apply_transition(transition, &self.project_window)
    }

    /// Moves the task to in progress from new or on hold.
    ///
    /// # Errors
    ///
    /// Propagates lifecycle errors; the guard never fails for this
    /// transition.
    pub fn start(&mut self) -> Result<bool, DeliveryDomainError> {
        self.task.mark_in_progress(&self.project_window)
    }

    /// Puts an in-progress task on hold.
    ///
    /// # Errors
    ///
    /// Propagates lifecycle errors; the guard never fails for this
    /// transition.
    pub fn pause(&mut self) -> Result<bool, DeliveryDomainError> {
        self.task.mark_on_hold(&self.project_window)
    }

    /// Completes an in-progress task.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the task's dates do not fit inside
    /// its project's window; the status is unchanged.
    pub fn complete(&mut self) -> Result<bool, DeliveryDomainError> {
        self.task.mark_completed(&self.project_window)
    }

    /// Cancels the task unless it is completed.
    ///
    /// # Errors
    ///
    /// Propagates lifecycle errors; the guard never fails for this
    /// transition.
    pub fn cancel(&mut self) -> Result<bool, DeliveryDomainError> {
        self.task.mark_cancelled(&self.project_window)
    }

    /// Renames the task.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] for a blank title.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        self.task.record.set_title(title)
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.task.record.set_description(description);
    }

    /// Reassigns the task.
    pub fn set_assignee(&mut self, assignee: Option<EmployeeRef>) {
        self.task.record.set_owner(assignee);
    }

    /// Moves the due date, keeping the old one if the task would no longer
    /// fit its own or its project's window.
    ///
    /// # Errors
    ///
    /// Returns the failed date validation.
    pub fn set_due_date(&mut self, due: Option<DateTime<Utc>>) -> Result<(), ValidationError> {
        self.task.set_due_date(due, &self.project_window)
    }

    /// Sets the estimated effort.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidHours`] for negative or non-finite
    /// values.
    pub fn set_estimated_hours(&mut self, hours: f64) -> Result<(), ValidationError> {
        self.task.estimated_hours = Hours::new(hours)?;
        Ok(())
    }

    /// Sets the priority.
    pub const fn set_priority(&mut self, priority: TaskPriority) {
        self.task.priority = priority;
    }
}

impl Deref for TaskMut<'_> {
    type Target = Task;

    fn deref(&self) -> &Self::Target {
        self.task
    }
}
