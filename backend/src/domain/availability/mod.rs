//! Declared member availability: weekly rules and dated exceptions.
//!
//! An exception that touches a slot's date and window overrides the weekly
//! pattern for that date. Weekly rules apply on their weekday inside their
//! optional validity bounds; any overlapping available window counts.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::CalendarValidationError;

mod exception;
mod recurring;
mod resolution;

pub use exception::{ExceptionKind, ScheduleException, ScheduleExceptionDraft};
pub use recurring::{MemberAvailability, MemberAvailabilityDraft};
pub use resolution::{AvailabilityVerdict, coverage_score, resolve_availability};

/// Validation errors raised by availability constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityValidationError {
    /// The window or weekday is invalid.
    Calendar(CalendarValidationError),
    /// `valid_until` precedes `valid_from`.
    ValidityInverted { from: NaiveDate, until: NaiveDate },
    /// Only one end of an exception window was given.
    PartialExceptionWindow,
}

impl fmt::Display for AvailabilityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calendar(err) => write!(f, "{err}"),
            Self::ValidityInverted { from, until } => write!(
                f,
                "availability valid-until {until} must not precede valid-from {from}"
            ),
            Self::PartialExceptionWindow => write!(
                f,
                "exception start and end times must both be set or both be omitted"
            ),
        }
    }
}

impl std::error::Error for AvailabilityValidationError {}

impl From<CalendarValidationError> for AvailabilityValidationError {
    fn from(value: CalendarValidationError) -> Self {
        Self::Calendar(value)
    }
}

/// A member's full declared availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityProfile {
    pub rules: Vec<MemberAvailability>,
    pub exceptions: Vec<ScheduleException>,
}
