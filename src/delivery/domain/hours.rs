//! Fractional hour quantities used for estimates and actuals.

use super::ValidationError;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A finite, non-negative number of hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hours(f64);

impl Hours {
    /// Zero hours.
    pub const ZERO: Self = Self(0.0);

    /// Creates a validated hour quantity.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidHours`] when the value is negative,
    /// infinite or `NaN`.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidHours(value));
        }
        Ok(Self(value))
    }

    /// Converts a duration to hours, truncated to whole minutes.
    ///
    /// Negative durations count as zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::TimeDelta;
    /// use worklog::delivery::domain::Hours;
    ///
    /// let hours = Hours::from_duration(TimeDelta::seconds(90 * 60 + 59));
    /// assert_eq!(hours.value(), 1.5);
    /// ```
    #[expect(
        clippy::float_arithmetic,
        reason = "hours are fractional by definition"
    )]
    #[expect(
        clippy::cast_precision_loss,
        reason = "minute counts stay far below 2^52"
    )]
    #[must_use]
    pub fn from_duration(duration: TimeDelta) -> Self {
        let minutes = duration.num_minutes().max(0);
        Self(minutes as f64 / 60.0)
    }

    /// Returns the number of hours.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns `self` as a percentage of `estimate`, or zero when there is no
    /// estimate.
    #[expect(
        clippy::float_arithmetic,
        reason = "progress is a fractional percentage"
    )]
    #[must_use]
    pub fn percent_of(self, estimate: Self) -> f64 {
        if estimate.0 > 0.0 {
            self.0 / estimate.0 * 100.0
        } else {
            0.0
        }
    }
}

impl Add for Hours {
    type Output = Self;

    #[expect(
        clippy::float_arithmetic,
        reason = "summing two non-negative finite values"
    )]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}h", self.0)
    }
}
