//! Error types for delivery domain validation, lifecycle rules and parsing.

use super::{ProjectId, Status, TaskId, TimeEntryId};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Malformed or out-of-range input rejected by a domain operation.
///
/// The operation that returns this error leaves its target unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// An identifier is empty after trimming.
    #[error("{kind} identifier must not be empty")]
    EmptyIdentifier {
        /// Kind of identifier that was rejected.
        kind: &'static str,
    },

    /// A title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The due date precedes the start date.
    #[error("due date {due} precedes start date {start}")]
    DueBeforeStart {
        /// Start of the rejected window.
        start: DateTime<Utc>,
        /// Due date of the rejected window.
        due: DateTime<Utc>,
    },

    /// A task would start before its project starts.
    #[error("task {task} starts at {task_start}, before its project starts at {project_start}")]
    TaskStartsBeforeProject {
        /// Offending task.
        task: TaskId,
        /// Task start date.
        task_start: DateTime<Utc>,
        /// Project start date.
        project_start: DateTime<Utc>,
    },

    /// A task would be due after its project is due.
    #[error("task {task} is due at {task_due}, after its project is due at {project_due}")]
    TaskDueAfterProject {
        /// Offending task.
        task: TaskId,
        /// Task due date.
        task_due: DateTime<Utc>,
        /// Project due date.
        project_due: DateTime<Utc>,
    },

    /// An hour value is negative or not finite.
    #[error("hours must be a finite non-negative number, got {0}")]
    InvalidHours(f64),

    /// A time entry end precedes its start.
    #[error("end time {end} precedes start time {start}")]
    EndBeforeStart {
        /// Entry start time.
        start: DateTime<Utc>,
        /// Rejected end time.
        end: DateTime<Utc>,
    },

    /// A time entry was routed to a task it does not reference.
    #[error("time entry {entry} is not logged against task {task}")]
    EntryForDifferentTask {
        /// Offending entry.
        entry: TimeEntryId,
        /// Task that received the entry.
        task: TaskId,
    },

    /// A time entry was routed to a project it does not reference.
    #[error("time entry {entry} belongs to project {expected}, not {actual}")]
    EntryProjectMismatch {
        /// Offending entry.
        entry: TimeEntryId,
        /// Project referenced by the entry.
        expected: ProjectId,
        /// Project that received the entry.
        actual: ProjectId,
    },

    /// A task was added to a project it is not bound to.
    #[error("task {task} belongs to project {expected}, not {actual}")]
    TaskProjectMismatch {
        /// Offending task.
        task: TaskId,
        /// Project the task is bound to.
        expected: ProjectId,
        /// Project that received the task.
        actual: ProjectId,
    },

    /// A task identifier is already used within the project.
    #[error("task {0} already exists in its project")]
    DuplicateTask(TaskId),

    /// The project has no task with the given identifier.
    #[error("task {task} not found in project {project}")]
    UnknownTask {
        /// Project that was searched.
        project: ProjectId,
        /// Missing task.
        task: TaskId,
    },

    /// A time entry has already been logged against the task.
    #[error("time entry {0} is already logged")]
    DuplicateEntry(TimeEntryId),
}

/// An operation attempted against a status or approval precondition it does
/// not satisfy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidStateTransition {
    /// A time entry cannot be approved before work stops.
    #[error("time entry {0} cannot be approved without an end time")]
    MissingEndTime(TimeEntryId),

    /// A project cannot complete while tasks remain unfinished.
    #[error("project {project} cannot complete with {unfinished} unfinished task(s)")]
    UnfinishedTasks {
        /// Project that was asked to complete.
        project: ProjectId,
        /// Number of tasks not yet completed.
        unfinished: usize,
    },

    /// Approved time entries are immutable.
    #[error("time entry {0} is approved and can no longer be changed")]
    EntryLocked(TimeEntryId),

    /// Only approved time entries contribute to hour totals.
    #[error("time entry {0} must be approved before its work is logged")]
    EntryNotApproved(TimeEntryId),

    /// Only tasks still in [`Status::New`] can join a project.
    #[error("task {task} is {status} and cannot be added to a project")]
    TaskAlreadyStarted {
        /// Offending task.
        task: TaskId,
        /// Status the task had reached.
        status: Status,
    },
}

/// Errors returned by delivery domain operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeliveryDomainError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A lifecycle or approval precondition failed.
    #[error(transparent)]
    InvalidStateTransition(#[from] InvalidStateTransition),
}

impl DeliveryDomainError {
    /// Returns `true` for input validation failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` for lifecycle precondition failures.
    #[must_use]
    pub const fn is_invalid_state_transition(&self) -> bool {
        matches!(self, Self::InvalidStateTransition(_))
    }
}

/// Error returned while parsing a lifecycle status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct ParseStatusError(pub String);

/// Error returned while parsing a task priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);
