//! Port for schedule persistence.

use async_trait::async_trait;

use crate::domain::{Schedule, ScheduleId, ScheduleStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by schedule repository adapters.
    pub enum ScheduleRepositoryError for "schedule repository" {
        /// A schedule with the same id already exists.
        AlreadyExists { schedule_id: String } =>
            "schedule {schedule_id} already exists",
    }
}

/// Port for storing schedules and switching their status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn insert(&self, schedule: &Schedule) -> Result<(), ScheduleRepositoryError>;

    async fn find_by_id(
        &self,
        schedule_id: &ScheduleId,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError>;

    /// List schedules ordered by start date then name, optionally by status.
    async fn list(
        &self,
        status: Option<ScheduleStatus>,
    ) -> Result<Vec<Schedule>, ScheduleRepositoryError>;

    /// Compare-and-set the status.
    ///
    /// Returns `false` when the stored status is no longer `expected` or the
    /// schedule has gone.
    async fn update_status(
        &self,
        schedule_id: &ScheduleId,
        expected: ScheduleStatus,
        next: ScheduleStatus,
    ) -> Result<bool, ScheduleRepositoryError>;

    /// Delete a schedule together with its slots and their assignments.
    ///
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, schedule_id: &ScheduleId) -> Result<bool, ScheduleRepositoryError>;
}
