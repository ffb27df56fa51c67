//! Shared state and status machine for dated work items.
//!
//! Projects and tasks both carry a title, an optional date window, an
//! optional owner and a lifecycle [`Status`]. [`TemporalEntity`] owns the
//! transition algorithm; implementors plug in a pre-commit gate and a
//! post-commit hook:
//!
//! 1. a transition whose guard does not match the current status is a
//!    silent no-op (`Ok(false)`, no gate, no hook);
//! 2. [`TemporalEntity::check_status_change`] may reject the new status, in
//!    which case nothing changes;
//! 3. the status is committed;
//! 4. [`TemporalEntity::on_status_changed`] runs and observes the new status.

use super::{DeliveryDomainError, EmployeeRef, Status, Transition, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional start and due dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: Option<DateTime<Utc>>,
    due: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// Creates a window from optional bounds without validating them.
    #[must_use]
    pub const fn new(start: Option<DateTime<Utc>>, due: Option<DateTime<Utc>>) -> Self {
        Self { start, due }
    }

    /// Returns a window with neither bound set.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::new(None, None)
    }

    /// Returns the start date, if any.
    #[must_use]
    pub const fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due(&self) -> Option<DateTime<Utc>> {
        self.due
    }

    /// Returns a copy with the due date replaced.
    #[must_use]
    pub const fn with_due(self, due: Option<DateTime<Utc>>) -> Self {
        Self::new(self.start, due)
    }

    /// Checks that the due date does not precede the start date.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DueBeforeStart`] when both bounds are set
    /// and `due < start`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (self.start, self.due) {
            (Some(start), Some(due)) if due < start => {
                Err(ValidationError::DueBeforeStart { start, due })
            }
            _ => Ok(()),
        }
    }
}

/// State common to projects and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalRecord {
    title: String,
    description: Option<String>,
    window: DateWindow,
    owner: Option<EmployeeRef>,
    status: Status,
}

impl TemporalRecord {
    /// Creates a record in [`Status::New`].
    pub(crate) fn new(
        title: impl Into<String>,
        description: Option<String>,
        window: DateWindow,
        owner: Option<EmployeeRef>,
    ) -> Result<Self, ValidationError> {
        let title = validated_title(title.into())?;
        window.validate()?;
        Ok(Self {
            title,
            description,
            window,
            owner,
            status: Status::New,
        })
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the date window.
    #[must_use]
    pub const fn window(&self) -> DateWindow {
        self.window
    }

    /// Returns the start date, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<DateTime<Utc>> {
        self.window.start
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.window.due
    }

    /// Returns the owner, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<&EmployeeRef> {
        self.owner.as_ref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    pub(crate) fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        self.title = validated_title(title.into())?;
        Ok(())
    }

    pub(crate) fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub(crate) fn set_owner(&mut self, owner: Option<EmployeeRef>) {
        self.owner = owner;
    }

    const fn set_window(&mut self, window: DateWindow) {
        self.window = window;
    }

    const fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

fn validated_title(title: String) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if trimmed.len() == title.len() {
        return Ok(title);
    }
    Ok(trimmed.to_owned())
}

/// A dated work item with a lifecycle status.
///
/// `Scope` is whatever surrounding state the implementor consults while
/// validating dates or reacting to status changes. The trait stays inside
/// the crate: a task's scope must be its own project's window, which only
/// [`super::Project::task_mut`] supplies.
pub(crate) trait TemporalEntity {
    /// Surrounding state passed to validation and hooks.
    type Scope: ?Sized;

    /// Returns the shared record.
    fn record(&self) -> &TemporalRecord;

    /// Returns the shared record mutably.
    fn record_mut(&mut self) -> &mut TemporalRecord;

    /// Validates the entity's dates.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DueBeforeStart`] from the default
    /// implementation; overrides may add further checks.
    fn validate_dates(&self, _scope: &Self::Scope) -> Result<(), ValidationError> {
        self.record().window().validate()
    }

    /// Gate run before `next` is committed.
    ///
    /// # Errors
    ///
    /// Any error aborts the transition with the status unchanged.
    fn check_status_change(
        &self,
        _next: Status,
        _scope: &Self::Scope,
    ) -> Result<(), DeliveryDomainError> {
        Ok(())
    }

    /// Hook run after `status` is committed.
    ///
    /// # Errors
    ///
    /// Errors are returned to the caller of the transition.
    fn on_status_changed(
        &mut self,
        _status: Status,
        _scope: &Self::Scope,
    ) -> Result<(), DeliveryDomainError> {
        Ok(())
    }

    /// Applies `transition`, returning whether the status changed hands.
    ///
    /// # Errors
    ///
    /// Returns the gate's error (status unchanged) or the hook's error.
    fn apply_transition(
        &mut self,
        transition: Transition,
        scope: &Self::Scope,
    ) -> Result<bool, DeliveryDomainError> {
        if !transition.permits(self.record().status()) {
            return Ok(false);
        }
        let next = transition.target();
        self.check_status_change(next, scope)?;
        self.record_mut().set_status(next);
        self.on_status_changed(next, scope)?;
        Ok(true)
    }

    /// Moves to [`Status::InProgress`] from `New` or `OnHold`.
    ///
    /// # Errors
    ///
    /// See [`TemporalEntity::apply_transition`].
    fn mark_in_progress(&mut self, scope: &Self::Scope) -> Result<bool, DeliveryDomainError> {
        self.apply_transition(Transition::Start, scope)
    }

    /// Moves to [`Status::OnHold`] from `InProgress`.
    ///
    /// # Errors
    ///
    /// See [`TemporalEntity::apply_transition`].
    fn mark_on_hold(&mut self, scope: &Self::Scope) -> Result<bool, DeliveryDomainError> {
        self.apply_transition(Transition::Hold, scope)
    }

    /// Moves to [`Status::Completed`] from `InProgress`.
    ///
    /// # Errors
    ///
    /// See [`TemporalEntity::apply_transition`].
    fn mark_completed(&mut self, scope: &Self::Scope) -> Result<bool, DeliveryDomainError> {
        self.apply_transition(Transition::Complete, scope)
    }

    /// Moves to [`Status::Cancelled`] from anything but `Completed`.
    ///
    /// # Errors
    ///
    /// See [`TemporalEntity::apply_transition`].
    fn mark_cancelled(&mut self, scope: &Self::Scope) -> Result<bool, DeliveryDomainError> {
        self.apply_transition(Transition::Cancel, scope)
    }

    /// Replaces the due date, keeping the previous one if the new dates fail
    /// [`TemporalEntity::validate_dates`].
    ///
    /// # Errors
    ///
    /// Returns the validation error; the due date is unchanged.
    fn set_due_date(
        &mut self,
        due: Option<DateTime<Utc>>,
        scope: &Self::Scope,
    ) -> Result<(), ValidationError> {
        let previous = self.record().window();
        self.record_mut().set_window(previous.with_due(due));
        if let Err(err) = self.validate_dates(scope) {
            self.record_mut().set_window(previous);
            return Err(err);
        }
        Ok(())
    }
}
