//! Driving port for schedule mutations.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    ActorId, Error, RecurringPattern, Schedule, ScheduleCategory, ScheduleId, ScheduleKind,
    ScheduleStatus,
};

/// Request to create a schedule in `draft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub actor: ActorId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: ScheduleKind,
    pub category: ScheduleCategory,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_pattern: Option<RecurringPattern>,
    #[serde(default)]
    pub territory_scope: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Request to move a schedule to another status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleStatusRequest {
    pub actor: ActorId,
    pub schedule_id: ScheduleId,
    pub status: ScheduleStatus,
}

/// Request to delete a schedule with everything it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteScheduleRequest {
    pub actor: ActorId,
    pub schedule_id: ScheduleId,
}

/// Driving port for schedule write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleCommand: Send + Sync {
    /// Create a schedule. Fails with `invalid_request` on a blank name or an
    /// end date before the start date.
    async fn create_schedule(&self, request: CreateScheduleRequest) -> Result<Schedule, Error>;

    /// Switch status. Fails with `invalid_transition` outside
    /// `draft -> active | cancelled`, `active <-> cancelled`, and
    /// `active -> completed`.
    async fn update_schedule_status(
        &self,
        request: UpdateScheduleStatusRequest,
    ) -> Result<Schedule, Error>;

    /// Delete a schedule, cascading to slots and assignments.
    async fn delete_schedule(&self, request: DeleteScheduleRequest) -> Result<(), Error>;
}
