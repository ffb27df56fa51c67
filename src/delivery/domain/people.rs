//! Opaque references to employees owned by the external staff registry.

use super::EmployeeId;
use serde::{Deserialize, Serialize};

/// Role of an employee as far as delivery rules are concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Individual contributor.
    #[default]
    Staff,
    /// Manager; joins the team of any project they own.
    Manager,
}

/// Reference to an employee.
///
/// Equality is by identity, so two references with the same identifier
/// denote the same person even if their display names differ.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct EmployeeRef {
    id: EmployeeId,
    full_name: String,
    role: StaffRole,
}

impl EmployeeRef {
    /// Creates a reference to a staff member.
    #[must_use]
    pub fn staff(id: EmployeeId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            role: StaffRole::Staff,
        }
    }

    /// Creates a reference to a manager.
    #[must_use]
    pub fn manager(id: EmployeeId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            role: StaffRole::Manager,
        }
    }

    /// Returns the employee identifier.
    #[must_use]
    pub const fn id(&self) -> &EmployeeId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the staff role.
    #[must_use]
    pub const fn role(&self) -> StaffRole {
        self.role
    }

    /// Returns `true` when the employee is a manager.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        matches!(self.role, StaffRole::Manager)
    }
}

impl PartialEq for EmployeeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::hash::Hash for EmployeeRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
