//! Assignment entity and its status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::enum_macros::define_string_enum;
use crate::domain::{ActorId, AssignmentId, Member, MemberId, SlotId, SlotView};

use super::{AssignmentAction, AssignmentTransitionError};

define_string_enum! {
    /// Lifecycle state of an assignment.
    pub enum AssignmentStatus as "assignment status" {
        Pending => "pending",
        Confirmed => "confirmed",
        Declined => "declined",
        Attended => "attended",
        Absent => "absent",
        Excused => "excused",
    }
}

impl AssignmentStatus {
    /// Whether the assignment occupies a seat on its slot.
    ///
    /// Absent and excused outcomes are historical only and free the seat.
    pub fn counts_toward_capacity(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Attended)
    }

    /// Whether the assignment blocks a second one for the same member.
    pub fn is_active(self) -> bool {
        self != Self::Declined
    }
}

define_string_enum! {
    /// Role a member plays on a shift.
    pub enum AssignmentRole as "assignment role" {
        Participant => "participant",
        Coordinator => "coordinator",
        Driver => "driver",
    }
}

impl Default for AssignmentRole {
    fn default() -> Self {
        Self::Participant
    }
}

define_string_enum! {
    /// Attendance result recorded after a shift.
    pub enum AttendanceOutcome as "attendance outcome" {
        Attended => "attended",
        Absent => "absent",
        Excused => "excused",
    }
}

impl From<AttendanceOutcome> for AssignmentStatus {
    fn from(value: AttendanceOutcome) -> Self {
        match value {
            AttendanceOutcome::Attended => Self::Attended,
            AttendanceOutcome::Absent => Self::Absent,
            AttendanceOutcome::Excused => Self::Excused,
        }
    }
}

/// Input payload for [`Assignment::new`].
#[derive(Debug, Clone)]
pub struct AssignmentDraft {
    pub id: AssignmentId,
    pub slot_id: SlotId,
    pub member_id: MemberId,
    pub assigned_by: Option<ActorId>,
    pub role: AssignmentRole,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Every stored field, used by adapters to rebuild an [`Assignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentParts {
    pub id: AssignmentId,
    pub slot_id: SlotId,
    pub member_id: MemberId,
    pub assigned_by: Option<ActorId>,
    pub role: AssignmentRole,
    pub status: AssignmentStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub decline_reason: Option<String>,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The relation between one member and one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    id: AssignmentId,
    slot_id: SlotId,
    member_id: MemberId,
    assigned_by: Option<ActorId>,
    role: AssignmentRole,
    status: AssignmentStatus,
    confirmed_at: Option<DateTime<Utc>>,
    decline_reason: Option<String>,
    check_in_at: Option<DateTime<Utc>>,
    check_out_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

impl Assignment {
    /// Create a `pending` assignment.
    pub fn new(draft: AssignmentDraft) -> Self {
        Self {
            id: draft.id,
            slot_id: draft.slot_id,
            member_id: draft.member_id,
            assigned_by: draft.assigned_by,
            role: draft.role,
            status: AssignmentStatus::Pending,
            confirmed_at: None,
            decline_reason: None,
            check_in_at: None,
            check_out_at: None,
            notes: trimmed(draft.notes),
            created_at: draft.created_at,
        }
    }

    /// Rebuild an assignment from stored parts without validation.
    pub fn from_parts(parts: AssignmentParts) -> Self {
        Self {
            id: parts.id,
            slot_id: parts.slot_id,
            member_id: parts.member_id,
            assigned_by: parts.assigned_by,
            role: parts.role,
            status: parts.status,
            confirmed_at: parts.confirmed_at,
            decline_reason: parts.decline_reason,
            check_in_at: parts.check_in_at,
            check_out_at: parts.check_out_at,
            notes: parts.notes,
            created_at: parts.created_at,
        }
    }

    /// Split into plain parts for persistence.
    pub fn into_parts(self) -> AssignmentParts {
        AssignmentParts {
            id: self.id,
            slot_id: self.slot_id,
            member_id: self.member_id,
            assigned_by: self.assigned_by,
            role: self.role,
            status: self.status,
            confirmed_at: self.confirmed_at,
            decline_reason: self.decline_reason,
            check_in_at: self.check_in_at,
            check_out_at: self.check_out_at,
            notes: self.notes,
            created_at: self.created_at,
        }
    }

    /// Stable assignment identifier.
    pub fn id(&self) -> AssignmentId {
        self.id
    }

    /// Slot the member is booked on.
    pub fn slot_id(&self) -> SlotId {
        self.slot_id
    }

    /// Booked member.
    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    /// The acting user who made the assignment, distinct from the member.
    pub fn assigned_by(&self) -> Option<ActorId> {
        self.assigned_by
    }

    /// Role the member fills on the shift.
    pub fn role(&self) -> AssignmentRole {
        self.role
    }

    /// Lifecycle status.
    pub fn status(&self) -> AssignmentStatus {
        self.status
    }

    /// When the member confirmed.
    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    /// Reason given when declining.
    pub fn decline_reason(&self) -> Option<&str> {
        self.decline_reason.as_deref()
    }

    /// Recorded arrival.
    pub fn check_in_at(&self) -> Option<DateTime<Utc>> {
        self.check_in_at
    }

    /// Recorded departure.
    pub fn check_out_at(&self) -> Option<DateTime<Utc>> {
        self.check_out_at
    }

    /// Free-text notes.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Booking timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn require(
        &self,
        expected: AssignmentStatus,
        action: AssignmentAction,
    ) -> Result<(), AssignmentTransitionError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(AssignmentTransitionError::IllegalTransition {
                from: self.status,
                action,
            })
        }
    }

    /// `pending -> confirmed`, stamping the confirmation time.
    pub fn confirm(&self, now: DateTime<Utc>) -> Result<Self, AssignmentTransitionError> {
        self.require(AssignmentStatus::Pending, AssignmentAction::Confirm)?;
        let mut next = self.clone();
        next.status = AssignmentStatus::Confirmed;
        next.confirmed_at = Some(now);
        Ok(next)
    }

    /// `pending -> declined`, keeping an optional reason.
    pub fn decline(&self, reason: Option<String>) -> Result<Self, AssignmentTransitionError> {
        self.require(AssignmentStatus::Pending, AssignmentAction::Decline)?;
        let mut next = self.clone();
        next.status = AssignmentStatus::Declined;
        next.decline_reason = trimmed(reason);
        Ok(next)
    }

    /// `confirmed -> attended | absent | excused`.
    ///
    /// Whether the shift has started is checked by the caller, which knows
    /// the slot and the clock.
    pub fn record_attendance(
        &self,
        outcome: AttendanceOutcome,
        check_in_at: Option<DateTime<Utc>>,
        check_out_at: Option<DateTime<Utc>>,
    ) -> Result<Self, AssignmentTransitionError> {
        self.require(AssignmentStatus::Confirmed, AssignmentAction::RecordAttendance)?;
        if let (Some(check_in), Some(check_out)) = (check_in_at, check_out_at) {
            if check_out < check_in {
                return Err(AssignmentTransitionError::CheckOutBeforeCheckIn);
            }
        }
        let mut next = self.clone();
        next.status = outcome.into();
        next.check_in_at = check_in_at;
        next.check_out_at = check_out_at;
        Ok(next)
    }
}

/// An assignment listed under its slot, with the member's display data.
///
/// `member` is `None` when the directory no longer knows the member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentWithMember {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub member: Option<Member>,
}

/// An assignment listed for a member, with its slot and schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentWithSlot {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub slot: SlotView,
}

/// Narrowing options for a member's assignment listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAssignmentFilter {
    /// Only slots that have not ended yet.
    #[serde(default)]
    pub upcoming: bool,
    #[serde(default)]
    pub status: Option<AssignmentStatus>,
}
