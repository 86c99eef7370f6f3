//! Driving port for declaring member availability.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ActorId, Error, ExceptionId, ExceptionKind, MemberAvailability, MemberId, ScheduleException,
};

fn available_by_default() -> bool {
    true
}

/// One weekly rule as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRulePayload {
    /// 0 (Sunday) through 6 (Saturday).
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Replace a member's weekly pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetWeeklyAvailabilityRequest {
    pub actor: ActorId,
    pub member_id: MemberId,
    pub rules: Vec<WeeklyRulePayload>,
}

/// Add a dated exception; omit both times for the whole day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExceptionRequest {
    pub actor: ActorId,
    pub member_id: MemberId,
    pub date: NaiveDate,
    pub kind: ExceptionKind,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request to delete one availability exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveExceptionRequest {
    pub actor: ActorId,
    pub exception_id: ExceptionId,
}

/// Driving port for managing member availability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityCommand: Send + Sync {
    /// Validate every rule, then replace the member's weekly rules at once.
    async fn set_weekly_availability(
        &self,
        request: SetWeeklyAvailabilityRequest,
    ) -> Result<Vec<MemberAvailability>, Error>;

    async fn add_exception(&self, request: AddExceptionRequest)
    -> Result<ScheduleException, Error>;

    async fn remove_exception(&self, request: RemoveExceptionRequest) -> Result<(), Error>;
}
