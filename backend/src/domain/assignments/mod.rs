//! Member-to-slot assignments and their lifecycle.
//!
//! An assignment is created `pending`. The member confirms or declines it;
//! once the shift has started an administrator records the attendance
//! outcome of a confirmed assignment. Declined assignments release their
//! seat and no longer block re-assignment of the same member.

use std::fmt;

mod assignment;
mod stats;

pub use assignment::{
    Assignment, AssignmentDraft, AssignmentParts, AssignmentRole, AssignmentStatus,
    AssignmentWithMember, AssignmentWithSlot, AttendanceOutcome, MemberAssignmentFilter,
};
pub use stats::ParticipationStats;

/// Lifecycle operation applied to an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentAction {
    /// Member accepts the shift.
    Confirm,
    /// Member turns the shift down.
    Decline,
    /// Administrator records the outcome.
    RecordAttendance,
}

impl fmt::Display for AssignmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Confirm => "confirm",
            Self::Decline => "decline",
            Self::RecordAttendance => "record attendance for",
        };
        f.write_str(label)
    }
}

/// Errors raised by assignment transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentTransitionError {
    /// The current status does not allow the action.
    IllegalTransition {
        from: AssignmentStatus,
        action: AssignmentAction,
    },
    /// The check-out time precedes the check-in time.
    CheckOutBeforeCheckIn,
}

impl fmt::Display for AssignmentTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalTransition { from, action } => {
                write!(f, "cannot {action} an assignment that is {from}")
            }
            Self::CheckOutBeforeCheckIn => {
                write!(f, "check-out time must not precede check-in time")
            }
        }
    }
}

impl std::error::Error for AssignmentTransitionError {}
