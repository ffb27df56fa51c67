//! Lifecycle status, transitions and task priority.

use super::{ParsePriorityError, ParseStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status shared by projects and tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Created; no work recorded yet.
    #[default]
    New,
    /// Work is under way.
    InProgress,
    /// Work is paused.
    OnHold,
    /// Work has finished.
    Completed,
    /// Work has been abandoned.
    Cancelled,
}

impl Status {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` when some transition leads from `self` to `target`.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        Transition::ALL
            .iter()
            .any(|transition| transition.target() == target && transition.permits(self))
    }

    /// Returns `true` for states no transition leads out of, other than a
    /// repeated cancellation.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Status {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "on_hold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

/// A requested status change.
///
/// Each transition has a fixed target and a guard over the current status.
/// A request whose guard fails is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Move to [`Status::InProgress`] from `New` or `OnHold`.
    Start,
    /// Move to [`Status::OnHold`] from `InProgress`.
    Hold,
    /// Move to [`Status::Completed`] from `InProgress`.
    Complete,
    /// Move to [`Status::Cancelled`] from anything but `Completed`.
    Cancel,
}

impl Transition {
    /// Every transition, in declaration order.
    pub const ALL: [Self; 4] = [Self::Start, Self::Hold, Self::Complete, Self::Cancel];

    /// Returns the status this transition leads to.
    #[must_use]
    pub const fn target(self) -> Status {
        match self {
            Self::Start => Status::InProgress,
            Self::Hold => Status::OnHold,
            Self::Complete => Status::Completed,
            Self::Cancel => Status::Cancelled,
        }
    }

    /// Returns `true` when the transition may fire from `current`.
    #[must_use]
    pub const fn permits(self, current: Status) -> bool {
        match self {
            Self::Start => matches!(current, Status::New | Status::OnHold),
            Self::Hold | Self::Complete => matches!(current, Status::InProgress),
            Self::Cancel => !matches!(current, Status::Completed),
        }
    }
}

/// Scheduling priority of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal priority.
    #[default]
    Medium,
    /// Should be picked up soon.
    High,
    /// Blocks other work.
    Critical,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}
