//! Project aggregate root.

use super::{
    DateWindow, DeliveryDomainError, EmployeeRef, Hours, InvalidStateTransition, ProjectId,
    Status, Task, TaskId, TaskMut, TemporalEntity, TemporalRecord, TimeEntry, ValidationError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project aggregate root.
///
/// A project owns its tasks and its team roster, and aggregates the hours
/// of every approved time entry logged against its tasks. Status changes
/// cascade to tasks:
///
/// - cancelling the project cancels every task;
/// - starting the project starts every task still in [`Status::New`];
/// - completing the project is rejected while any task is unfinished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    record: TemporalRecord,
    tasks: Vec<Task>,
    team: Vec<EmployeeRef>,
    estimated_hours: Hours,
    actual_hours: Hours,
}

impl Project {
    /// Creates a project in [`Status::New`].
    ///
    /// An owner who is a manager joins the team.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] for a blank title or
    /// [`ValidationError::DueBeforeStart`] for an inverted window.
    pub fn new(
        id: ProjectId,
        title: impl Into<String>,
        description: Option<String>,
        start_date: Option<DateTime<Utc>>,
        due_date: Option<DateTime<Utc>>,
        owner: Option<EmployeeRef>,
    ) -> Result<Self, ValidationError> {
        let team = owner
            .iter()
            .filter(|employee| employee.is_manager())
            .cloned()
            .collect();
        let record = TemporalRecord::new(
            title,
            description,
            DateWindow::new(start_date, due_date),
            owner,
        )?;
        Ok(Self {
            id,
            record,
            tasks: Vec::new(),
            team,
            estimated_hours: Hours::ZERO,
            actual_hours: Hours::ZERO,
        })
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> &ProjectId {
        &self.id
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

    /// Returns the date window.
    #[must_use]
    pub const fn window(&self) -> DateWindow {
        self.record.window()
    }

    /// Returns the start date, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<DateTime<Utc>> {
        self.record.start_date()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.record.due_date()
    }

    /// Returns the owner, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<&EmployeeRef> {
        self.record.owner()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.record.status()
    }

    /// Returns the tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the task with the given identifier.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns mutable access to the task with the given identifier.
    #[must_use]
    pub fn task_mut(&mut self, id: &TaskId) -> Option<TaskMut<'_>> {
        let window = self.record.window();
        self.tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .map(|task| TaskMut::new(task, window))
    }

    /// Returns the team roster in joining order.
    #[must_use]
    pub fn team(&self) -> &[EmployeeRef] {
        &self.team
    }

    /// Returns the estimated effort.
    #[must_use]
    pub const fn estimated_hours(&self) -> Hours {
        self.estimated_hours
    }

    /// Returns the sum of approved hours logged against the project's tasks
    /// and any direct hour updates.
    #[must_use]
    pub const fn actual_hours(&self) -> Hours {
        self.actual_hours
    }

    /// Returns actual hours as a percentage of the estimate, or zero without
    /// an estimate.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.actual_hours.percent_of(self.estimated_hours)
    }

    /// Renames the project.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] for a blank title.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        self.record.set_title(title)
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.record.set_description(description);
    }

    /// Replaces the owner. The team roster is left as is.
    pub fn set_owner(&mut self, owner: Option<EmployeeRef>) {
        self.record.set_owner(owner);
    }

    /// Moves the due date, keeping the old one if it would precede the start
    /// date.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DueBeforeStart`].
    pub fn set_due_date(&mut self, due: Option<DateTime<Utc>>) -> Result<(), ValidationError> {
        <Self as TemporalEntity>::set_due_date(self, due, &())
    }

    /// Sets the estimated effort.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidHours`] for negative or non-finite
    /// values.
    pub fn set_estimated_hours(&mut self, hours: f64) -> Result<(), ValidationError> {
        self.estimated_hours = Hours::new(hours)?;
        Ok(())
    }

    /// Appends a task; a new project moves to in progress.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TaskProjectMismatch`] when the task was
    /// created for another project, [`ValidationError::DuplicateTask`] when
    /// its identifier is taken, and
    /// [`InvalidStateTransition::TaskAlreadyStarted`] for a task that has
    /// left [`Status::New`].
    pub fn add_task(&mut self, task: Task) -> Result<(), DeliveryDomainError> {
        if task.project_id() != &self.id {
            return Err(ValidationError::TaskProjectMismatch {
                task: task.id().clone(),
                expected: task.project_id().clone(),
                actual: self.id.clone(),
            }
            .into());
        }
        if self.task(task.id()).is_some() {
            return Err(ValidationError::DuplicateTask(task.id().clone()).into());
        }
        if task.status() != Status::New {
            return Err(InvalidStateTransition::TaskAlreadyStarted {
                task: task.id().clone(),
                status: task.status(),
            }
            .into());
        }
        self.tasks.push(task);
        self.start_if_new()
    }

    /// Adds `member` to the team unless someone with the same identifier is
    /// already on it. Returns whether the roster changed.
    pub fn add_team_member(&mut self, member: EmployeeRef) -> bool {
        if self.team.contains(&member) {
            return false;
        }
        self.team.push(member);
        true
    }

    /// Adds `delta` hours to the project total; a new project moves to in
    /// progress.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidHours`] for negative or non-finite
    /// deltas; the total is unchanged.
    pub fn update_actual_hours(&mut self, delta: f64) -> Result<(), DeliveryDomainError> {
        let hours = Hours::new(delta)?;
        self.record_hours(hours)
    }

    /// Logs an approved entry against one of this project's tasks.
    ///
    /// The task and the project both accumulate the entry's hours. The
    /// project starts if it is new, then the task starts if it is still new.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownTask`] when `task_id` is not part of
    /// this project, [`ValidationError::EntryForDifferentTask`] or
    /// [`ValidationError::EntryProjectMismatch`] when the entry references
    /// other work, [`InvalidStateTransition::EntryNotApproved`] for
    /// unapproved entries and [`ValidationError::DuplicateEntry`] for an
    /// entry the task already holds. Nothing changes on error.
    pub fn log_work(&mut self, task_id: &TaskId, entry: TimeEntry) -> Result<(), DeliveryDomainError> {
        let hours = self
            .tasks
            .iter_mut()
            .find(|task| task.id() == task_id)
            .ok_or_else(|| ValidationError::UnknownTask {
                project: self.id.clone(),
                task: task_id.clone(),
            })?
            .record_work(entry)?;
        self.record_hours(hours)?;

        let window = self.record.window();
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id() == task_id) {
            if task.status() == Status::New {
                task.mark_in_progress(&window)?;
            }
        }
        Ok(())
    }

    /// Moves the project to in progress from new or on hold.
    ///
    /// # Errors
    ///
    /// Propagates cascade errors; none occur for this transition.
    pub fn start(&mut self) -> Result<bool, DeliveryDomainError> {
        self.mark_in_progress(&())
    }

    /// Puts an in-progress project on hold.
    ///
    /// # Errors
    ///
    /// Propagates lifecycle errors; none occur for this transition.
    pub fn pause(&mut self) -> Result<bool, DeliveryDomainError> {
        self.mark_on_hold(&())
    }

    /// Completes an in-progress project.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateTransition::UnfinishedTasks`] while any task is
    /// not completed; the status is unchanged.
    pub fn complete(&mut self) -> Result<bool, DeliveryDomainError> {
        self.mark_completed(&())
    }

    /// Cancels the project and all of its tasks unless it is completed.
    ///
    /// # Errors
    ///
    /// Propagates cascade errors; none occur for this transition.
    pub fn cancel(&mut self) -> Result<bool, DeliveryDomainError> {
        self.mark_cancelled(&())
    }

    fn record_hours(&mut self, hours: Hours) -> Result<(), DeliveryDomainError> {
        self.actual_hours += hours;
        self.start_if_new()
    }

    fn start_if_new(&mut self) -> Result<(), DeliveryDomainError> {
        if self.status() == Status::New {
            self.mark_in_progress(&())?;
        }
        Ok(())
    }
}

impl TemporalEntity for Project {
    type Scope = ();

    fn record(&self) -> &TemporalRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut TemporalRecord {
        &mut self.record
    }

    fn check_status_change(&self, next: Status, _scope: &()) -> Result<(), DeliveryDomainError> {
        if next != Status::Completed {
            return Ok(());
        }
        let unfinished = self
            .tasks
            .iter()
            .filter(|task| task.status() != Status::Completed)
            .count();
        if unfinished > 0 {
            return Err(InvalidStateTransition::UnfinishedTasks {
                project: self.id.clone(),
                unfinished,
            }
            .into());
        }
        Ok(())
    }

    fn on_status_changed(&mut self, status: Status, _scope: &()) -> Result<(), DeliveryDomainError> {
        let window = self.record.window();
        match status {
            Status::Cancelled => {
                for task in &mut self.tasks {
                    task.mark_cancelled(&window)?;
                }
            }
            Status::InProgress => {
                for task in self
                    .tasks
                    .iter_mut()
                    .filter(|task| task.status() == Status::New)
                {
                    task.mark_in_progress(&window)?;
                }
            }
            Status::New | Status::OnHold | Status::Completed => {}
        }
        Ok(())
    }
}
