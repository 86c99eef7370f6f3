//! Driving port for slot creation, generation, and removal.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::{ActorId, Error, ScheduleId, Slot, SlotId, SlotView};

/// Batch generation request: one slot per matching weekday in the range.
///
/// Weekdays are numbered 0 (Sunday) through 6 (Saturday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSlotsRequest {
    pub actor: ActorId,
    pub schedule_id: ScheduleId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_of_week: Vec<u8>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_details: Option<String>,
    /// Falls back to the configured default when omitted.
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub min_participants: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Single slot creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    pub actor: ActorId,
    pub schedule_id: ScheduleId,
    pub name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_details: Option<String>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub min_participants: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request naming one slot on behalf of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotActionRequest {
    pub actor: ActorId,
    pub slot_id: SlotId,
}

/// Driving port for creating, generating, and cancelling slots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotCommand: Send + Sync {
    /// Expand a weekday mask over a date range into slots.
    ///
    /// An inverted range or empty weekday set yields an empty list. The
    /// template is validated before anything is written, and the batch is
    /// written all-or-nothing.
    async fn generate_slots(&self, request: GenerateSlotsRequest) -> Result<Vec<Slot>, Error>;

    async fn create_slot(&self, request: CreateSlotRequest) -> Result<Slot, Error>;

    /// Delete a slot and its assignments.
    async fn delete_slot(&self, request: SlotActionRequest) -> Result<(), Error>;

    /// Apply the manual cancel override; cancelling twice is an
    /// `invalid_transition`.
    async fn cancel_slot(&self, request: SlotActionRequest) -> Result<SlotView, Error>;
}
