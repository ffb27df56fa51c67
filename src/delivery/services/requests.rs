//! Request payloads for delivery use cases.

use crate::delivery::domain::{EmployeeRef, TaskPriority};
use chrono::{DateTime, Utc};

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProjectRequest {
    pub(super) project_id: String,
    pub(super) title: String,
    pub(super) description: Option<String>,
    pub(super) start_date: Option<DateTime<Utc>>,
    pub(super) due_date: Option<DateTime<Utc>>,
    pub(super) owner: Option<EmployeeRef>,
    pub(super) estimated_hours: Option<f64>,
}

impl CreateProjectRequest {
    /// Creates a request with the required project fields.
    #[must_use]
    pub fn new(project_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            title: title.into(),
            description: None,
            start_date: None,
            due_date: None,
            owner: None,
            estimated_hours: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the owner; managers also join the team.
    #[must_use]
    pub fn with_owner(mut self, owner: EmployeeRef) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Sets the estimated effort in hours.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }
}

/// Request payload for adding a task to a project.
#[derive(Debug, Clone, PartialEq)]
pub struct AddTaskRequest {
    pub(super) project_id: String,
    pub(super) task_id: String,
    pub(super) title: String,
    pub(super) assignee: Option<EmployeeRef>,
    pub(super) due_date: Option<DateTime<Utc>>,
    pub(super) estimated_hours: Option<f64>,
    pub(super) priority: TaskPriority,
}

impl AddTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        task_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            task_id: task_id.into(),
            title: title.into(),
            assignee: None,
            due_date: None,
            estimated_hours: None,
            priority: TaskPriority::default(),
        }
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: EmployeeRef) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the estimated effort in hours.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// Request payload for opening a time entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTimeEntryRequest {
    pub(super) entry_id: String,
    pub(super) employee_id: String,
    pub(super) project_id: String,
    pub(super) task_id: Option<String>,
    pub(super) start_time: Option<DateTime<Utc>>,
    pub(super) description: Option<String>,
}

impl StartTimeEntryRequest {
    /// Creates a request for work on a project. Work starts now unless
    /// [`StartTimeEntryRequest::with_start_time`] says otherwise.
    #[must_use]
    pub fn new(
        entry_id: impl Into<String>,
        employee_id: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            employee_id: employee_id.into(),
            project_id: project_id.into(),
            task_id: None,
            start_time: None,
            description: None,
        }
    }

    /// Ties the entry to a task of the project.
    #[must_use]
    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Sets when work began.
    #[must_use]
    pub const fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
