//! Domain model for project delivery.
//!
//! Projects own tasks; tasks own the approved time entries logged against
//! them. Status changes flow down (project cascades to tasks) and hours flow
//! up (entry to task to project). Everything here is synchronous and free of
//! infrastructure concerns.

mod error;
mod hours;
mod ids;
mod people;
mod project;
mod status;
mod task;
mod temporal;
mod time_entry;

pub use error::{
    DeliveryDomainError, InvalidStateTransition, ParsePriorityError, ParseStatusError,
    ValidationError,
};
pub use hours::Hours;
pub use ids::{EmployeeId, ProjectId, TaskId, TimeEntryId};
pub use people::{EmployeeRef, StaffRole};
pub use project::Project;
pub use status::{Status, TaskPriority, Transition};
pub use task::{Task, TaskMut};
pub(crate) use temporal::TemporalEntity;
pub use temporal::{DateWindow, TemporalRecord};
pub use time_entry::TimeEntry;
