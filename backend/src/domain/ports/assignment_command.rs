//! Driving port for the assignment lifecycle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ActorId, Assignment, AssignmentId, AssignmentRole, AttendanceOutcome, Error, MemberId,
    SlotId, SlotStatus,
};

/// Request to assign a member to a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignMemberRequest {
    /// The acting user, recorded as `assignedBy`.
    pub actor: ActorId,
    pub slot_id: SlotId,
    pub member_id: MemberId,
    #[serde(default)]
    pub role: AssignmentRole,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Outcome of a successful assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignMemberResponse {
    pub assignment: Assignment,
    /// Slot status recomputed after the insert.
    pub slot_status: SlotStatus,
    /// Set when the warn capacity policy let the slot go over capacity.
    pub overbooked: bool,
}

/// Request naming one assignment on behalf of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentActionRequest {
    pub actor: ActorId,
    pub assignment_id: AssignmentId,
}

/// Request to decline a pending assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclineAssignmentRequest {
    pub actor: ActorId,
    pub assignment_id: AssignmentId,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request to record the attendance outcome of a confirmed assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAttendanceRequest {
    pub actor: ActorId,
    pub assignment_id: AssignmentId,
    pub outcome: AttendanceOutcome,
    #[serde(default)]
    pub check_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check_out_at: Option<DateTime<Utc>>,
}

/// An assignment after a transition, with its slot's recomputed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentChange {
    pub assignment: Assignment,
    pub slot_status: SlotStatus,
}

/// Result of removing an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveAssignmentResponse {
    pub slot_id: SlotId,
    pub slot_status: SlotStatus,
}

/// Driving port for the assignment lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentCommand: Send + Sync {
    /// Create a pending assignment.
    ///
    /// Fails with `duplicate_assignment` when the member already holds a
    /// non-declined assignment on the slot, `capacity_exceeded` when the
    /// slot is full under the reject policy, and `invalid_transition` when
    /// the slot is cancelled or completed.
    async fn assign(&self, request: AssignMemberRequest) -> Result<AssignMemberResponse, Error>;

    /// Hard-delete an assignment.
    async fn remove_assignment(
        &self,
        request: AssignmentActionRequest,
    ) -> Result<RemoveAssignmentResponse, Error>;

    /// `pending -> confirmed`.
    async fn confirm_assignment(
        &self,
        request: AssignmentActionRequest,
    ) -> Result<AssignmentChange, Error>;

    /// `pending -> declined`.
    async fn decline_assignment(
        &self,
        request: DeclineAssignmentRequest,
    ) -> Result<AssignmentChange, Error>;

    /// `confirmed -> attended | absent | excused`, once the slot has started.
    async fn record_attendance(
        &self,
        request: RecordAttendanceRequest,
    ) -> Result<AssignmentChange, Error>;
}
