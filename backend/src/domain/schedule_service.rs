//! Schedule domain service.
//!
//! Implements the schedule driving ports: creation in `draft`, guarded
//! status changes, cascading deletes, and reads.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    CreateScheduleRequest, DeleteScheduleRequest, ScheduleCommand, ScheduleQuery,
    ScheduleRepository, UpdateScheduleStatusRequest,
};
use crate::domain::service_support::{
    map_schedule_repository_error, map_schedule_validation_error,
};
use crate::domain::{Error, Schedule, ScheduleDraft, ScheduleId, ScheduleStatus};

/// Schedule service implementing [`ScheduleCommand`] and [`ScheduleQuery`].
#[derive(Clone)]
pub struct ScheduleService<S> {
    schedules: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> ScheduleService<S> {
    /// Create a schedule service over the given repository and clock.
    pub fn new(schedules: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { schedules, clock }
    }
}

impl<S> ScheduleService<S>
where
    S: ScheduleRepository,
{
    async fn load(&self, schedule_id: &ScheduleId) -> Result<Schedule, Error> {
        self.schedules
            .find_by_id(schedule_id)
            .await
            .map_err(map_schedule_repository_error)?
            .ok_or_else(|| Error::not_found(format!("schedule {schedule_id} not found")))
    }
}

#[async_trait]
impl<S> ScheduleCommand for ScheduleService<S>
where
    S: ScheduleRepository,
{
    async fn create_schedule(&self, request: CreateScheduleRequest) -> Result<Schedule, Error> {
        let schedule = Schedule::new(ScheduleDraft {
            id: ScheduleId::random(),
            name: request.name,
            description: request.description,
            kind: request.kind,
            category: request.category,
            start_date: request.start_date,
            end_date: request.end_date,
            is_recurring: request.is_recurring,
            recurring_pattern: request.recurring_pattern,
            territory_scope: request.territory_scope,
            color: request.color,
            created_by: Some(request.actor),
            created_at: self.clock.utc(),
        })
        .map_err(map_schedule_validation_error)?;

        if schedule.has_unexpected_end_date() {
            warn!(
                schedule_id = %schedule.id(),
                "permanent schedule created with an end date"
            );
        }

        self.schedules
            .insert(&schedule)
            .await
            .map_err(map_schedule_repository_error)?;
        info!(schedule_id = %schedule.id(), actor = %request.actor, "schedule created");
        Ok(schedule)
    }

    async fn update_schedule_status(
        &self,
        request: UpdateScheduleStatusRequest,
    ) -> Result<Schedule, Error> {
        let current = self.load(&request.schedule_id).await?;
        let next = current
            .transition_to(request.status)
            .map_err(map_schedule_validation_error)?;

        let applied = self
            .schedules
            .update_status(&request.schedule_id, current.status(), next.status())
            .await
            .map_err(map_schedule_repository_error)?;
        if !applied {
            return Err(Error::concurrency_conflict(format!(
                "schedule {} changed status concurrently",
                request.schedule_id
            )));
        }

        info!(
            schedule_id = %request.schedule_id,
            from = %current.status(),
            to = %next.status(),
            actor = %request.actor,
            "schedule status changed"
        );
        Ok(next)
    }

    async fn delete_schedule(&self, request: DeleteScheduleRequest) -> Result<(), Error> {
        let deleted = self
            .schedules
            .delete(&request.schedule_id)
            .await
            .map_err(map_schedule_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!(
                "schedule {} not found",
                request.schedule_id
            )));
        }
        info!(schedule_id = %request.schedule_id, actor = %request.actor, "schedule deleted");
        Ok(())
    }
}

#[async_trait]
impl<S> ScheduleQuery for ScheduleService<S>
where
    S: ScheduleRepository,
{
    async fn get_schedule(&self, schedule_id: &ScheduleId) -> Result<Schedule, Error> {
        self.load(schedule_id).await
    }

    async fn list_schedules(&self, status: Option<ScheduleStatus>) -> Result<Vec<Schedule>, Error> {
        self.schedules
            .list(status)
            .await
            .map_err(map_schedule_repository_error)
    }
}

#[cfg(test)]
#[path = "schedule_service_tests.rs"]
mod tests;
