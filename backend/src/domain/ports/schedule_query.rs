//! Driving port for schedule reads.

use async_trait::async_trait;

use crate::domain::{Error, Schedule, ScheduleId, ScheduleStatus};

/// Driving port for reading schedules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleQuery: Send + Sync {
    async fn get_schedule(&self, schedule_id: &ScheduleId) -> Result<Schedule, Error>;

    async fn list_schedules(&self, status: Option<ScheduleStatus>) -> Result<Vec<Schedule>, Error>;
}
