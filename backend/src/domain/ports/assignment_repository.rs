//! Port for assignment persistence.
//!
//! Adapters own the race-sensitive checks: the duplicate rule and the
//! capacity check run atomically with the insert, and status updates are
//! compare-and-set on the status the caller last saw.

use async_trait::async_trait;

use crate::domain::{Assignment, AssignmentId, AssignmentStatus, MemberId, SlotId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by assignment repository adapters.
    pub enum AssignmentRepositoryError for "assignment repository" {
        /// The member already holds a non-declined assignment on the slot.
        Duplicate { slot_id: String, member_id: String } =>
            "member {member_id} already has an active assignment on slot {slot_id}",
        /// The slot was full when the insert was attempted.
        CapacityExceeded { occupancy: u32, max_participants: u32 } =>
            "slot is full ({occupancy} of {max_participants} seats taken)",
        /// The slot no longer exists.
        SlotNotFound { slot_id: String } =>
            "slot {slot_id} does not exist",
        /// The slot was cancelled before the insert took its lock.
        SlotCancelled { slot_id: String } =>
            "slot {slot_id} is cancelled",
    }
}

/// Capacity rule applied atomically with an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityGuard {
    pub max_participants: u32,
    /// When `false` the insert proceeds even if the slot is full.
    pub enforce: bool,
}

/// Port for creating, transitioning, and listing assignments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Insert a pending assignment and return the slot's occupancy after it.
    ///
    /// Fails with `SlotCancelled` when the slot is cancelled at write time.
    async fn insert(
        &self,
        assignment: &Assignment,
        guard: CapacityGuard,
    ) -> Result<u32, AssignmentRepositoryError>;

    async fn find_by_id(
        &self,
        assignment_id: &AssignmentId,
    ) -> Result<Option<Assignment>, AssignmentRepositoryError>;

    /// Persist `assignment` if the stored status still equals `expected`.
    ///
    /// Returns `false` when another writer moved the assignment first.
    async fn update(
        &self,
        assignment: &Assignment,
        expected: AssignmentStatus,
    ) -> Result<bool, AssignmentRepositoryError>;

    /// Hard-delete; `false` when it did not exist.
    async fn delete(&self, assignment_id: &AssignmentId)
    -> Result<bool, AssignmentRepositoryError>;

    /// Assignments on a slot in creation order.
    async fn list_for_slot(
        &self,
        slot_id: &SlotId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError>;

    /// Assignments held by a member in creation order.
    async fn list_for_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError>;
}
