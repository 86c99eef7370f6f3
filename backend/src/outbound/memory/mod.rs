//! In-process implementation of every scheduling driven port.
//!
//! One mutex guards the whole state, so the duplicate and capacity checks of
//! an assignment insert and every compare-and-set run atomically with their
//! write. Deletes cascade the same way the PostgreSQL schema does.
//!
//! Used by the integration tests and by embedders that do not need
//! durability.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use tracing::debug;

use crate::domain::ports::{
    AssignmentRepository, AssignmentRepositoryError, AvailabilityRepository,
    AvailabilityRepositoryError, CapacityGuard, MemberDirectory, MemberDirectoryError,
    ScheduleRepository, ScheduleRepositoryError, SlotRepository, SlotRepositoryError,
};
use crate::domain::{
    Assignment, AssignmentId, AssignmentStatus, ExceptionId, Member, MemberAvailability, MemberId,
    Schedule, ScheduleException, ScheduleId, ScheduleStatus, ScheduledSlot, Slot, SlotId,
};

#[derive(Debug, Default)]
struct State {
    schedules: BTreeMap<ScheduleId, Schedule>,
    slots: HashMap<SlotId, Slot>,
    /// Creation order.
    assignments: Vec<Assignment>,
    rules: Vec<MemberAvailability>,
    exceptions: Vec<ScheduleException>,
    members: HashMap<MemberId, Member>,
}

impl State {
    fn occupancy(&self, slot_id: SlotId) -> u32 {
        let seats = self
            .assignments
            .iter()
            .filter(|assignment| {
                assignment.slot_id() == slot_id && assignment.status().counts_toward_capacity()
            })
            .count();
        u32::try_from(seats).unwrap_or(u32::MAX)
    }

    fn scheduled(&self, slot: &Slot) -> Result<ScheduledSlot, SlotRepositoryError> {
        let schedule = self.schedules.get(&slot.schedule_id()).ok_or_else(|| {
            SlotRepositoryError::query(format!("slot {} has no schedule", slot.id()))
        })?;
        Ok(ScheduledSlot {
            slot: slot.clone(),
            schedule: schedule.summary(),
            occupancy: self.occupancy(slot.id()),
        })
    }

    fn remove_slots_where(&mut self, doomed: impl Fn(&Slot) -> bool) -> usize {
        let removed: Vec<SlotId> = self
            .slots
            .values()
            .filter(|slot| doomed(*slot))
            .map(Slot::id)
            .collect();
        for slot_id in &removed {
            self.slots.remove(slot_id);
        }
        self.assignments
            .retain(|assignment| !removed.contains(&assignment.slot_id()));
        removed.len()
    }
}

/// Mutex-guarded store implementing all five driven ports.
#[derive(Debug, Default)]
pub struct InMemorySchedulingStore {
    state: Mutex<State>,
}

impl InMemorySchedulingStore {
    /// An empty store with no members.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member as if mirrored from the membership subsystem.
    pub fn seed_member(&self, member: Member) -> Result<(), MemberDirectoryError> {
        let mut state = self.lock(MemberDirectoryError::query)?;
        state.members.insert(member.id(), member);
        Ok(())
    }

    fn lock<E>(&self, query: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, State>, E> {
        self.state.lock().map_err(|_| {
            debug!("in-memory scheduling store lock poisoned");
            query("store lock poisoned")
        })
    }
}

#[async_trait]
impl ScheduleRepository for InMemorySchedulingStore {
    async fn insert(&self, schedule: &Schedule) -> Result<(), ScheduleRepositoryError> {
        let mut state = self.lock(ScheduleRepositoryError::query)?;
        if state.schedules.contains_key(&schedule.id()) {
            return Err(ScheduleRepositoryError::already_exists(
                schedule.id().to_string(),
            ));
        }
        state.schedules.insert(schedule.id(), schedule.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        schedule_id: &ScheduleId,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError> {
        let state = self.lock(ScheduleRepositoryError::query)?;
        Ok(state.schedules.get(schedule_id).cloned())
    }

    async fn list(
        &self,
        status: Option<ScheduleStatus>,
    ) -> Result<Vec<Schedule>, ScheduleRepositoryError> {
        let state = self.lock(ScheduleRepositoryError::query)?;
        let mut schedules: Vec<Schedule> = state
            .schedules
            .values()
            .filter(|schedule| status.is_none_or(|wanted| schedule.status() == wanted))
            .cloned()
            .collect();
        schedules.sort_by(|a, b| {
            (a.start_date(), a.name()).cmp(&(b.start_date(), b.name()))
        });
        Ok(schedules)
    }

    async fn update_status(
        &self,
        schedule_id: &ScheduleId,
        expected: ScheduleStatus,
        next: ScheduleStatus,
    ) -> Result<bool, ScheduleRepositoryError> {
        let mut state = self.lock(ScheduleRepositoryError::query)?;
        let Some(current) = state.schedules.get(schedule_id) else {
            return Ok(false);
        };
        if current.status() != expected {
            return Ok(false);
        }
        let moved = current
            .transition_to(next)
            .map_err(|err| ScheduleRepositoryError::query(err.to_string()))?;
        state.schedules.insert(*schedule_id, moved);
        Ok(true)
    }

    async fn delete(&self, schedule_id: &ScheduleId) -> Result<bool, ScheduleRepositoryError> {
        let mut state = self.lock(ScheduleRepositoryError::query)?;
        if state.schedules.remove(schedule_id).is_none() {
            return Ok(false);
        }
        let owner = *schedule_id;
        state.remove_slots_where(|slot| slot.schedule_id() == owner);
        Ok(true)
    }
}

#[async_trait]
impl SlotRepository for InMemorySchedulingStore {
    async fn insert_many(&self, batch: &[Slot]) -> Result<(), SlotRepositoryError> {
        let mut state = self.lock(SlotRepositoryError::query)?;
        if let Some(orphan) = batch
            .iter()
            .find(|slot| !state.schedules.contains_key(&slot.schedule_id()))
        {
            return Err(SlotRepositoryError::missing_schedule(
                orphan.schedule_id().to_string(),
            ));
        }
        if let Some(clash) = batch.iter().find(|slot| state.slots.contains_key(&slot.id())) {
            return Err(SlotRepositoryError::query(format!(
                "slot {} already exists",
                clash.id()
            )));
        }
        for slot in batch {
            state.slots.insert(slot.id(), slot.clone());
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        slot_id: &SlotId,
    ) -> Result<Option<ScheduledSlot>, SlotRepositoryError> {
        let state = self.lock(SlotRepositoryError::query)?;
        state
            .slots
            .get(slot_id)
            .map(|slot| state.scheduled(slot))
            .transpose()
    }

    async fn list_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduledSlot>, SlotRepositoryError> {
        let state = self.lock(SlotRepositoryError::query)?;
        let mut listed = state
            .slots
            .values()
            .filter(|slot| slot.date() >= start && slot.date() <= end)
            .map(|slot| state.scheduled(slot))
            .collect::<Result<Vec<_>, _>>()?;
        listed.sort_by(|a, b| {
            (a.slot.starts_at(), a.slot.name()).cmp(&(b.slot.starts_at(), b.slot.name()))
        });
        Ok(listed)
    }

    async fn delete(&self, slot_id: &SlotId) -> Result<bool, SlotRepositoryError> {
        let mut state = self.lock(SlotRepositoryError::query)?;
        let target = *slot_id;
        Ok(state.remove_slots_where(|slot| slot.id() == target) > 0)
    }

    async fn mark_cancelled(&self, slot_id: &SlotId) -> Result<bool, SlotRepositoryError> {
        let mut state = self.lock(SlotRepositoryError::query)?;
        let Some(slot) = state.slots.get_mut(slot_id) else {
            return Ok(false);
        };
        match slot.cancel() {
            Ok(cancelled) => {
                *slot = cancelled;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}

#[async_trait]
impl AssignmentRepository for InMemorySchedulingStore {
    async fn insert(
        &self,
        assignment: &Assignment,
        guard: CapacityGuard,
    ) -> Result<u32, AssignmentRepositoryError> {
        let mut state = self.lock(AssignmentRepositoryError::query)?;
        let slot_id = assignment.slot_id();
        match state.slots.get(&slot_id) {
            None => {
                return Err(AssignmentRepositoryError::slot_not_found(
                    slot_id.to_string(),
                ));
            }
            Some(slot) if slot.is_cancelled() => {
                return Err(AssignmentRepositoryError::slot_cancelled(
                    slot_id.to_string(),
                ));
            }
            Some(_) => {}
        }
        if state
            .assignments
            .iter()
            .any(|existing| existing.id() == assignment.id())
        {
            return Err(AssignmentRepositoryError::query(format!(
                "assignment {} already exists",
                assignment.id()
            )));
        }
        let duplicate = state.assignments.iter().any(|existing| {
            existing.slot_id() == slot_id
                && existing.member_id() == assignment.member_id()
                && existing.status().is_active()
        });
        if duplicate {
            return Err(AssignmentRepositoryError::duplicate(
                slot_id.to_string(),
                assignment.member_id().to_string(),
            ));
        }

        let occupancy = state.occupancy(slot_id);
        let holds_seat = assignment.status().counts_toward_capacity();
        if guard.enforce && holds_seat && occupancy >= guard.max_participants {
            return Err(AssignmentRepositoryError::capacity_exceeded(
                occupancy,
                guard.max_participants,
            ));
        }
        state.assignments.push(assignment.clone());
        Ok(if holds_seat { occupancy + 1 } else { occupancy })
    }

    async fn find_by_id(
        &self,
        assignment_id: &AssignmentId,
    ) -> Result<Option<Assignment>, AssignmentRepositoryError> {
        let state = self.lock(AssignmentRepositoryError::query)?;
        Ok(state
            .assignments
            .iter()
            .find(|assignment| assignment.id() == *assignment_id)
            .cloned())
    }

    async fn update(
        &self,
        assignment: &Assignment,
        expected: AssignmentStatus,
    ) -> Result<bool, AssignmentRepositoryError> {
        let mut state = self.lock(AssignmentRepositoryError::query)?;
        let Some(stored) = state
            .assignments
            .iter_mut()
            .find(|stored| stored.id() == assignment.id())
        else {
            return Ok(false);
        };
        if stored.status() != expected {
            return Ok(false);
        }
        *stored = assignment.clone();
        Ok(true)
    }

    async fn delete(
        &self,
        assignment_id: &AssignmentId,
    ) -> Result<bool, AssignmentRepositoryError> {
        let mut state = self.lock(AssignmentRepositoryError::query)?;
        let before = state.assignments.len();
        state
            .assignments
            .retain(|assignment| assignment.id() != *assignment_id);
        Ok(state.assignments.len() < before)
    }

    async fn list_for_slot(
        &self,
        slot_id: &SlotId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError> {
        let state = self.lock(AssignmentRepositoryError::query)?;
        Ok(state
            .assignments
            .iter()
            .filter(|assignment| assignment.slot_id() == *slot_id)
            .cloned()
            .collect())
    }

    async fn list_for_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError> {
        let state = self.lock(AssignmentRepositoryError::query)?;
        Ok(state
            .assignments
            .iter()
            .filter(|assignment| assignment.member_id() == *member_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AvailabilityRepository for InMemorySchedulingStore {
    async fn rules_for_weekday(
        &self,
        weekday: Weekday,
    ) -> Result<Vec<MemberAvailability>, AvailabilityRepositoryError> {
        let state = self.lock(AvailabilityRepositoryError::query)?;
        Ok(state
            .rules
            .iter()
            .filter(|rule| rule.day_of_week() == weekday)
            .cloned()
            .collect())
    }

    async fn exceptions_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleException>, AvailabilityRepositoryError> {
        let state = self.lock(AvailabilityRepositoryError::query)?;
        Ok(state
            .exceptions
            .iter()
            .filter(|exception| exception.date() == date)
            .cloned()
            .collect())
    }

    async fn rules_for_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<MemberAvailability>, AvailabilityRepositoryError> {
        let state = self.lock(AvailabilityRepositoryError::query)?;
        Ok(state
            .rules
            .iter()
            .filter(|rule| rule.member_id() == *member_id)
            .cloned()
            .collect())
    }

    async fn exceptions_for_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<ScheduleException>, AvailabilityRepositoryError> {
        let state = self.lock(AvailabilityRepositoryError::query)?;
        let mut exceptions: Vec<ScheduleException> = state
            .exceptions
            .iter()
            .filter(|exception| exception.member_id() == *member_id)
            .cloned()
            .collect();
        exceptions.sort_by_key(ScheduleException::date);
        Ok(exceptions)
    }

    async fn replace_rules(
        &self,
        member_id: &MemberId,
        rules: &[MemberAvailability],
    ) -> Result<(), AvailabilityRepositoryError> {
        let mut state = self.lock(AvailabilityRepositoryError::query)?;
        state.rules.retain(|rule| rule.member_id() != *member_id);
        state.rules.extend_from_slice(rules);
        Ok(())
    }

    async fn insert_exception(
        &self,
        exception: &ScheduleException,
    ) -> Result<(), AvailabilityRepositoryError> {
        let mut state = self.lock(AvailabilityRepositoryError::query)?;
        state.exceptions.push(exception.clone());
        Ok(())
    }

    async fn delete_exception(
        &self,
        exception_id: &ExceptionId,
    ) -> Result<bool, AvailabilityRepositoryError> {
        let mut state = self.lock(AvailabilityRepositoryError::query)?;
        let before = state.exceptions.len();
        state
            .exceptions
            .retain(|exception| exception.id() != *exception_id);
        Ok(state.exceptions.len() < before)
    }
}

#[async_trait]
impl MemberDirectory for InMemorySchedulingStore {
    async fn find_by_id(&self, member_id: &MemberId) -> Result<Option<Member>, MemberDirectoryError> {
        let state = self.lock(MemberDirectoryError::query)?;
        Ok(state.members.get(member_id).cloned())
    }

    async fn find_many(&self, member_ids: &[MemberId]) -> Result<Vec<Member>, MemberDirectoryError> {
        let state = self.lock(MemberDirectoryError::query)?;
        let mut found: Vec<Member> = member_ids
            .iter()
            .filter_map(|id| state.members.get(id).cloned())
            .collect();
        found.sort_by(|a, b| (a.full_name(), a.id()).cmp(&(b.full_name(), b.id())));
        found.dedup_by_key(|member| member.id());
        Ok(found)
    }
}
