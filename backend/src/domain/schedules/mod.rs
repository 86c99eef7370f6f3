//! Schedule definitions: named work plans that own dated slots.
//!
//! A schedule starts in `draft`, is switched to `active` or `cancelled`
//! explicitly, and owns its slots (deleting a schedule cascades to them).

use std::fmt;

use chrono::NaiveDate;

mod schedule;
#[cfg(test)]
mod tests;

pub use schedule::{
    RecurringPattern, Schedule, ScheduleCategory, ScheduleDraft, ScheduleKind, ScheduleStatus,
    ScheduleSummary,
};

/// Validation errors raised by schedule constructors and transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleValidationError {
    /// The name was blank.
    EmptyName,
    /// The end date precedes the start date.
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    /// The requested status equals the current one.
    StatusUnchanged { status: ScheduleStatus },
    /// The lifecycle does not allow this move.
    IllegalStatusChange {
        from: ScheduleStatus,
        to: ScheduleStatus,
    },
}

impl fmt::Display for ScheduleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "schedule name must not be blank"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "schedule end date {end} must not precede start date {start}")
            }
            Self::StatusUnchanged { status } => {
                write!(f, "schedule is already {status}")
            }
            Self::IllegalStatusChange { from, to } => {
                write!(f, "schedule cannot move from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for ScheduleValidationError {}
