//! Slot domain service.
//!
//! Creates slots one at a time or in batches from a weekday mask, applies
//! the manual cancel override, and serves calendar reads with status derived
//! at call time.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CreateSlotRequest, GenerateSlotsRequest, ScheduleRepository, SlotActionRequest, SlotCommand,
    SlotQuery, SlotRepository,
};
use crate::domain::service_support::{
    local_now, map_schedule_repository_error, map_slot_repository_error,
    map_slot_validation_error,
};
use crate::domain::{
    DaySet, Error, Schedule, ScheduleId, ScheduledSlot, SchedulingPolicy, Slot, SlotBatch,
    SlotId, SlotTemplate, SlotTemplateDraft, SlotView,
};

/// Slot service implementing [`SlotCommand`] and [`SlotQuery`].
#[derive(Clone)]
pub struct SlotService<S, L> {
    schedules: Arc<S>,
    slots: Arc<L>,
    clock: Arc<dyn Clock>,
    policy: SchedulingPolicy,
}

impl<S, L> SlotService<S, L> {
    /// Create a slot service; `policy` supplies the default seat count and local offset.
    pub fn new(
        schedules: Arc<S>,
        slots: Arc<L>,
        clock: Arc<dyn Clock>,
        policy: SchedulingPolicy,
    ) -> Self {
        Self {
            schedules,
            slots,
            clock,
            policy,
        }
    }
}

impl<S, L> SlotService<S, L>
where
    S: ScheduleRepository,
    L: SlotRepository,
{
    async fn load_schedule(&self, schedule_id: &ScheduleId) -> Result<Schedule, Error> {
        self.schedules
            .find_by_id(schedule_id)
            .await
            .map_err(map_schedule_repository_error)?
            .ok_or_else(|| Error::not_found(format!("schedule {schedule_id} not found")))
    }

    async fn load_slot(&self, slot_id: &SlotId) -> Result<ScheduledSlot, Error> {
        self.slots
            .find_by_id(slot_id)
            .await
            .map_err(map_slot_repository_error)?
            .ok_or_else(|| Error::not_found(format!("slot {slot_id} not found")))
    }

    fn warn_outside_window(&self, schedule: &Schedule, slots: &[Slot]) {
        let outside = slots
            .iter()
            .filter(|slot| !schedule.covers(slot.date()))
            .count();
        if outside > 0 {
            warn!(
                schedule_id = %schedule.id(),
                outside,
                "slots dated outside the schedule window"
            );
        }
    }
}

#[async_trait]
impl<S, L> SlotCommand for SlotService<S, L>
where
    S: ScheduleRepository,
    L: SlotRepository,
{
    async fn generate_slots(&self, request: GenerateSlotsRequest) -> Result<Vec<Slot>, Error> {
        let schedule = self.load_schedule(&request.schedule_id).await?;
        let days_of_week = DaySet::from_indices(request.days_of_week.iter().copied())
            .map_err(|err| Error::invalid_request(format!("invalid weekday set: {err}")))?;
        let template = SlotTemplate::new(SlotTemplateDraft {
            name: request.name,
            start_time: request.start_time,
            end_time: request.end_time,
            location: request.location,
            location_details: request.location_details,
            max_participants: request
                .max_participants
                .unwrap_or(self.policy.default_max_participants),
            min_participants: request.min_participants.unwrap_or(0),
            notes: request.notes,
        })
        .map_err(map_slot_validation_error)?;

        let batch = SlotBatch {
            start_date: request.start_date,
            end_date: request.end_date,
            days_of_week,
            template,
        };
        let slots = batch.expand(schedule.id(), SlotId::random);
        if slots.is_empty() {
            debug!(schedule_id = %schedule.id(), "slot batch matched no dates");
            return Ok(slots);
        }
        self.warn_outside_window(&schedule, &slots);

        self.slots
            .insert_many(&slots)
            .await
            .map_err(map_slot_repository_error)?;
        info!(
            schedule_id = %schedule.id(),
            count = slots.len(),
            actor = %request.actor,
            "slots generated"
        );
        Ok(slots)
    }

    async fn create_slot(&self, request: CreateSlotRequest) -> Result<Slot, Error> {
        let schedule = self.load_schedule(&request.schedule_id).await?;
        let template = SlotTemplate::new(SlotTemplateDraft {
            name: request.name,
            start_time: request.start_time,
            end_time: request.end_time,
            location: request.location,
            location_details: request.location_details,
            max_participants: request
                .max_participants
                .unwrap_or(self.policy.default_max_participants),
            min_participants: request.min_participants.unwrap_or(0),
            notes: request.notes,
        })
        .map_err(map_slot_validation_error)?;
        let slot = template.instantiate(SlotId::random(), schedule.id(), request.date);
        self.warn_outside_window(&schedule, std::slice::from_ref(&slot));

        self.slots
            .insert_many(std::slice::from_ref(&slot))
            .await
            .map_err(map_slot_repository_error)?;
        info!(
            slot_id = %slot.id(),
            schedule_id = %schedule.id(),
            actor = %request.actor,
            "slot created"
        );
        Ok(slot)
    }

    async fn delete_slot(&self, request: SlotActionRequest) -> Result<(), Error> {
        let deleted = self
            .slots
            .delete(&request.slot_id)
            .await
            .map_err(map_slot_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!("slot {} not found", request.slot_id)));
        }
        info!(slot_id = %request.slot_id, actor = %request.actor, "slot deleted");
        Ok(())
    }

    async fn cancel_slot(&self, request: SlotActionRequest) -> Result<SlotView, Error> {
        let current = self.load_slot(&request.slot_id).await?;
        let cancelled = current.slot.cancel().map_err(map_slot_validation_error)?;

        let applied = self
            .slots
            .mark_cancelled(&request.slot_id)
            .await
            .map_err(map_slot_repository_error)?;
        if !applied {
            return Err(Error::concurrency_conflict(format!(
                "slot {} was cancelled or removed concurrently",
                request.slot_id
            )));
        }
        info!(slot_id = %request.slot_id, actor = %request.actor, "slot cancelled");

        let now = local_now(self.clock.as_ref(), &self.policy);
        Ok(ScheduledSlot {
            slot: cancelled,
            ..current
        }
        .into_view(now))
    }
}

#[async_trait]
impl<S, L> SlotQuery for SlotService<S, L>
where
    S: ScheduleRepository,
    L: SlotRepository,
{
    async fn get_slot(&self, slot_id: &SlotId) -> Result<SlotView, Error> {
        let slot = self.load_slot(slot_id).await?;
        Ok(slot.into_view(local_now(self.clock.as_ref(), &self.policy)))
    }

    async fn get_slots_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SlotView>, Error> {
        if end < start {
            return Ok(Vec::new());
        }
        let slots = self
            .slots
            .list_between(start, end)
            .await
            .map_err(map_slot_repository_error)?;
        let now = local_now(self.clock.as_ref(), &self.policy);
        Ok(slots.into_iter().map(|slot| slot.into_view(now)).collect())
    }
}

#[cfg(test)]
#[path = "slot_service_tests.rs"]
mod tests;
