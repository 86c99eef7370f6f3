//! Assignment lifecycle service.
//!
//! Assignment creation delegates the duplicate rule and the capacity check
//! to the repository so they run atomically with the insert. Every later
//! transition is validated on the entity and then written compare-and-set
//! against the status it was validated from.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AssignMemberRequest, AssignMemberResponse, AssignmentActionRequest, AssignmentChange,
    AssignmentCommand, AssignmentQuery, AssignmentRepository, CapacityGuard,
    DeclineAssignmentRequest, MemberDirectory, RecordAttendanceRequest, RemoveAssignmentResponse,
    SlotRepository,
};
use crate::domain::service_support::{
    local_now, map_assignment_repository_error, map_member_directory_error,
    map_slot_repository_error, map_transition_error,
};
use crate::domain::{
    Assignment, AssignmentDraft, AssignmentId, AssignmentStatus, AssignmentWithMember,
    AssignmentWithSlot, CapacityPolicy, Error, MemberAssignmentFilter, MemberId,
    ParticipationStats, ScheduledSlot, SchedulingPolicy, SlotId, SlotStatus,
};

/// Assignment service implementing [`AssignmentCommand`] and
/// [`AssignmentQuery`].
#[derive(Clone)]
pub struct AssignmentService<L, A, M> {
    slots: Arc<L>,
    assignments: Arc<A>,
    members: Arc<M>,
    clock: Arc<dyn Clock>,
    policy: SchedulingPolicy,
}

impl<L, A, M> AssignmentService<L, A, M> {
    /// Create an assignment service; `policy` decides how capacity is enforced.
    pub fn new(
        slots: Arc<L>,
        assignments: Arc<A>,
        members: Arc<M>,
        clock: Arc<dyn Clock>,
        policy: SchedulingPolicy,
    ) -> Self {
        Self {
            slots,
            assignments,
            members,
            clock,
            policy,
        }
    }

    fn now(&self) -> NaiveDateTime {
        local_now(self.clock.as_ref(), &self.policy)
    }
}

impl<L, A, M> AssignmentService<L, A, M>
where
    L: SlotRepository,
    A: AssignmentRepository,
    M: MemberDirectory,
{
    async fn load_slot(&self, slot_id: &SlotId) -> Result<ScheduledSlot, Error> {
        self.slots
            .find_by_id(slot_id)
            .await
            .map_err(map_slot_repository_error)?
            .ok_or_else(|| Error::not_found(format!("slot {slot_id} not found")))
    }

    async fn load_assignment(&self, assignment_id: &AssignmentId) -> Result<Assignment, Error> {
        self.assignments
            .find_by_id(assignment_id)
            .await
            .map_err(map_assignment_repository_error)?
            .ok_or_else(|| Error::not_found(format!("assignment {assignment_id} not found")))
    }

    async fn slot_status(&self, slot_id: &SlotId) -> Result<SlotStatus, Error> {
        let slot = self.load_slot(slot_id).await?;
        Ok(slot.status(self.now()))
    }

    /// Write `next` if the stored status still equals `previous`.
    async fn apply(
        &self,
        next: Assignment,
        previous: AssignmentStatus,
    ) -> Result<AssignmentChange, Error> {
        let applied = self
            .assignments
            .update(&next, previous)
            .await
            .map_err(map_assignment_repository_error)?;
        if !applied {
            return Err(Error::concurrency_conflict(format!(
                "assignment {} changed concurrently",
                next.id()
            )));
        }
        info!(
            assignment_id = %next.id(),
            from = %previous,
            to = %next.status(),
            "assignment transitioned"
        );
        let slot_status = self.slot_status(&next.slot_id()).await?;
        Ok(AssignmentChange {
            assignment: next,
            slot_status,
        })
    }
}

#[async_trait]
impl<L, A, M> AssignmentCommand for AssignmentService<L, A, M>
where
    L: SlotRepository,
    A: AssignmentRepository,
    M: MemberDirectory,
{
    async fn assign(&self, request: AssignMemberRequest) -> Result<AssignMemberResponse, Error> {
        let scheduled = self.load_slot(&request.slot_id).await?;
        let now = self.now();
        let status = scheduled.status(now);
        if !status.accepts_assignments() {
            return Err(Error::invalid_transition(format!(
                "slot {} is {status} and accepts no assignments",
                request.slot_id
            )));
        }

        self.members
            .find_by_id(&request.member_id)
            .await
            .map_err(map_member_directory_error)?
            .ok_or_else(|| Error::not_found(format!("member {} not found", request.member_id)))?;

        let assignment = Assignment::new(AssignmentDraft {
            id: AssignmentId::random(),
            slot_id: request.slot_id,
            member_id: request.member_id,
            assigned_by: Some(request.actor),
            role: request.role,
            notes: request.notes,
            created_at: self.clock.utc(),
        });
        let max_participants = scheduled.slot.max_participants();
        let guard = CapacityGuard {
            max_participants,
            enforce: self.policy.capacity_policy == CapacityPolicy::Reject,
        };
        let occupancy = self
            .assignments
            .insert(&assignment, guard)
            .await
            .map_err(map_assignment_repository_error)?;

        let overbooked = occupancy > max_participants;
        if overbooked {
            warn!(
                slot_id = %request.slot_id,
                occupancy,
                max_participants,
                "slot overbooked under the warn capacity policy"
            );
        }
        info!(
            assignment_id = %assignment.id(),
            slot_id = %request.slot_id,
            member_id = %request.member_id,
            actor = %request.actor,
            "member assigned"
        );
        Ok(AssignMemberResponse {
            slot_status: SlotStatus::derive(&scheduled.slot, occupancy, now),
            assignment,
            overbooked,
        })
    }

    async fn remove_assignment(
        &self,
        request: AssignmentActionRequest,
    ) -> Result<RemoveAssignmentResponse, Error> {
        let assignment = self.load_assignment(&request.assignment_id).await?;
        let deleted = self
            .assignments
            .delete(&request.assignment_id)
            .await
            .map_err(map_assignment_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!(
                "assignment {} not found",
                request.assignment_id
            )));
        }
        info!(
            assignment_id = %request.assignment_id,
            actor = %request.actor,
            "assignment removed"
        );

        let slot_id = assignment.slot_id();
        let slot_status = self.slot_status(&slot_id).await?;
        Ok(RemoveAssignmentResponse {
            slot_id,
            slot_status,
        })
    }

    async fn confirm_assignment(
        &self,
        request: AssignmentActionRequest,
    ) -> Result<AssignmentChange, Error> {
        let current = self.load_assignment(&request.assignment_id).await?;
        let next = current
            .confirm(self.clock.utc())
            .map_err(map_transition_error)?;
        self.apply(next, current.status()).await
    }

    async fn decline_assignment(
        &self,
        request: DeclineAssignmentRequest,
    ) -> Result<AssignmentChange, Error> {
        let current = self.load_assignment(&request.assignment_id).await?;
        let next = current
            .decline(request.reason)
            .map_err(map_transition_error)?;
        self.apply(next, current.status()).await
    }

    async fn record_attendance(
        &self,
        request: RecordAttendanceRequest,
    ) -> Result<AssignmentChange, Error> {
        let current = self.load_assignment(&request.assignment_id).await?;
        let next = current
            .record_attendance(request.outcome, request.check_in_at, request.check_out_at)
            .map_err(map_transition_error)?;

        let scheduled = self.load_slot(&current.slot_id()).await?;
        if self.now() < scheduled.slot.starts_at() {
            return Err(Error::invalid_transition(format!(
                "slot {} has not started yet",
                scheduled.slot.id()
            )));
        }
        self.apply(next, current.status()).await
    }
}

#[async_trait]
impl<L, A, M> AssignmentQuery for AssignmentService<L, A, M>
where
    L: SlotRepository,
    A: AssignmentRepository,
    M: MemberDirectory,
{
    async fn get_assignments_by_slot(
        &self,
        slot_id: &SlotId,
    ) -> Result<Vec<AssignmentWithMember>, Error> {
        self.load_slot(slot_id).await?;
        let assignments = self
            .assignments
            .list_for_slot(slot_id)
            .await
            .map_err(map_assignment_repository_error)?;
        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let member_ids: Vec<MemberId> = assignments
            .iter()
            .map(Assignment::member_id)
            .collect();
        let members: HashMap<MemberId, _> = self
            .members
            .find_many(&member_ids)
            .await
            .map_err(map_member_directory_error)?
            .into_iter()
            .map(|member| (member.id(), member))
            .collect();

        Ok(assignments
            .into_iter()
            .map(|assignment| AssignmentWithMember {
                member: members.get(&assignment.member_id()).cloned(),
                assignment,
            })
            .collect())
    }

    async fn get_assignments_by_member(
        &self,
        member_id: &MemberId,
        filter: MemberAssignmentFilter,
    ) -> Result<Vec<AssignmentWithSlot>, Error> {
        let assignments = self
            .assignments
            .list_for_member(member_id)
            .await
            .map_err(map_assignment_repository_error)?;
        let now = self.now();

        let mut listed = Vec::new();
        for assignment in assignments {
            if filter
                .status
                .is_some_and(|status| status != assignment.status())
            {
                continue;
            }
            let Some(scheduled) = self
                .slots
                .find_by_id(&assignment.slot_id())
                .await
                .map_err(map_slot_repository_error)?
            else {
                continue;
            };
            if filter.upcoming && scheduled.slot.ends_at() < now {
                continue;
            }
            listed.push(AssignmentWithSlot {
                assignment,
                slot: scheduled.into_view(now),
            });
        }
        listed.sort_by_key(|entry| entry.slot.slot.starts_at());
        Ok(listed)
    }

    async fn get_participation_stats(
        &self,
        member_id: &MemberId,
    ) -> Result<ParticipationStats, Error> {
        let assignments = self
            .assignments
            .list_for_member(member_id)
            .await
            .map_err(map_assignment_repository_error)?;
        Ok(ParticipationStats::from_statuses(
            assignments.iter().map(Assignment::status),
        ))
    }
}

#[cfg(test)]
#[path = "assignment_service_tests.rs"]
mod tests;
