//! Candidate suggestion service.
//!
//! Gathers the slot, its active assignments, and the availability declared
//! for the slot's date, then ranks the members who declared something.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use tracing::debug;

use crate::domain::ports::{
    AssignmentRepository, AvailabilityRepository, CandidateQuery, MemberDirectory, SlotRepository,
};
use crate::domain::service_support::{
    map_assignment_repository_error, map_availability_repository_error,
    map_member_directory_error, map_slot_repository_error,
};
use crate::domain::{Candidate, Error, MemberId, SlotId, rank_candidates};

/// Suggestion service implementing [`CandidateQuery`].
#[derive(Clone)]
pub struct CandidateService<L, A, V, M> {
    slots: Arc<L>,
    assignments: Arc<A>,
    availability: Arc<V>,
    members: Arc<M>,
}

impl<L, A, V, M> CandidateService<L, A, V, M> {
    /// Create a candidate ranking service over the four read ports.
    pub fn new(slots: Arc<L>, assignments: Arc<A>, availability: Arc<V>, members: Arc<M>) -> Self {
        Self {
            slots,
            assignments,
            availability,
            members,
        }
    }
}

#[async_trait]
impl<L, A, V, M> CandidateQuery for CandidateService<L, A, V, M>
where
    L: SlotRepository,
    A: AssignmentRepository,
    V: AvailabilityRepository,
    M: MemberDirectory,
{
    async fn suggest_candidates(&self, slot_id: &SlotId) -> Result<Vec<Candidate>, Error> {
        let scheduled = self
            .slots
            .find_by_id(slot_id)
            .await
            .map_err(map_slot_repository_error)?
            .ok_or_else(|| Error::not_found(format!("slot {slot_id} not found")))?;
        let slot = scheduled.slot;

        let already_assigned: HashSet<MemberId> = self
            .assignments
            .list_for_slot(slot_id)
            .await
            .map_err(map_assignment_repository_error)?
            .into_iter()
            .filter(|assignment| assignment.status().is_active())
            .map(|assignment| assignment.member_id())
            .collect();

        let rules = self
            .availability
            .rules_for_weekday(slot.date().weekday())
            .await
            .map_err(map_availability_repository_error)?;
        let exceptions = self
            .availability
            .exceptions_on(slot.date())
            .await
            .map_err(map_availability_repository_error)?;

        let declared: Vec<MemberId> = rules
            .iter()
            .map(|rule| rule.member_id())
            .chain(exceptions.iter().map(|exception| exception.member_id()))
            .filter(|member_id| !already_assigned.contains(member_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if declared.is_empty() {
            debug!(slot_id = %slot_id, "no member declared availability for slot");
            return Ok(Vec::new());
        }

        let members = self
            .members
            .find_many(&declared)
            .await
            .map_err(map_member_directory_error)?;

        let candidates = rank_candidates(&slot, &members, &already_assigned, &rules, &exceptions);
        debug!(
            slot_id = %slot_id,
            declared = declared.len(),
            suggested = candidates.len(),
            "candidates ranked"
        );
        Ok(candidates)
    }
}

#[cfg(test)]
#[path = "candidate_service_tests.rs"]
mod tests;
