//! Driving port for assignment listings and participation statistics.

use async_trait::async_trait;

use crate::domain::{
    AssignmentWithMember, AssignmentWithSlot, Error, MemberAssignmentFilter, MemberId,
    ParticipationStats, SlotId,
};

/// Driving port for assignment listings and participation statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentQuery: Send + Sync {
    async fn get_assignments_by_slot(
        &self,
        slot_id: &SlotId,
    ) -> Result<Vec<AssignmentWithMember>, Error>;

    /// A member's assignments ordered by slot start.
    async fn get_assignments_by_member(
        &self,
        member_id: &MemberId,
        filter: MemberAssignmentFilter,
    ) -> Result<Vec<AssignmentWithSlot>, Error>;

    async fn get_participation_stats(
        &self,
        member_id: &MemberId,
    ) -> Result<ParticipationStats, Error>;
}
