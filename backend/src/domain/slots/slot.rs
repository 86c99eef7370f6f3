//! Slot entity and the validated template shared by every generated slot.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::domain::{ScheduleId, ScheduleSummary, SlotId, TimeWindow};

use super::{MAX_SEATS, SlotStatus, SlotValidationError};

/// Unvalidated shift template fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTemplateDraft {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: Option<String>,
    pub location_details: Option<String>,
    pub max_participants: u32,
    pub min_participants: u32,
    pub notes: Option<String>,
}

/// Shift fields shared by every slot expanded from one request.
///
/// ## Invariants
/// - `name` is non-blank.
/// - `window.start < window.end`.
/// - `1 <= max_participants` and `min_participants <= max_participants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotTemplate {
    name: String,
    #[serde(flatten)]
    window: TimeWindow,
    location: Option<String>,
    location_details: Option<String>,
    max_participants: u32,
    min_participants: u32,
    notes: Option<String>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

impl SlotTemplate {
    /// Validate seat counts and the time window.
    pub fn new(draft: SlotTemplateDraft) -> Result<Self, SlotValidationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(SlotValidationError::EmptyName);
        }
        let window = TimeWindow::new(draft.start_time, draft.end_time)?;
        if draft.max_participants == 0 {
            return Err(SlotValidationError::ZeroCapacity);
        }
        if draft.max_participants > MAX_SEATS {
            return Err(SlotValidationError::CapacityTooLarge {
                max: draft.max_participants,
            });
        }
        if draft.min_participants > draft.max_participants {
            return Err(SlotValidationError::MinimumExceedsCapacity {
                min: draft.min_participants,
                max: draft.max_participants,
            });
        }

        Ok(Self {
            name: name.to_owned(),
            window,
            location: trimmed(draft.location),
            location_details: trimmed(draft.location_details),
            max_participants: draft.max_participants,
            min_participants: draft.min_participants,
            notes: trimmed(draft.notes),
        })
    }

    /// Slot name copied onto every generated slot.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Daily start and end.
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Seats per slot.
    pub fn max_participants(&self) -> u32 {
        self.max_participants
    }

    /// Stamp the template onto a concrete date.
    pub fn instantiate(&self, id: SlotId, schedule_id: ScheduleId, date: NaiveDate) -> Slot {
        Slot {
            id,
            schedule_id,
            date,
            template: self.clone(),
            is_cancelled: false,
        }
    }
}

/// One concrete shift instance belonging to a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    id: SlotId,
    schedule_id: ScheduleId,
    date: NaiveDate,
    #[serde(flatten)]
    template: SlotTemplate,
    is_cancelled: bool,
}

impl Slot {
    /// Rebuild a stored slot, including its cancel override.
    pub fn restore(
        id: SlotId,
        schedule_id: ScheduleId,
        date: NaiveDate,
        template: SlotTemplate,
        is_cancelled: bool,
    ) -> Self {
        Self {
            id,
            schedule_id,
            date,
            template,
            is_cancelled,
        }
    }

    /// Stable slot identifier.
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Owning schedule.
    pub fn schedule_id(&self) -> ScheduleId {
        self.schedule_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.template.name()
    }

    /// Calendar date of the shift.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Start and end on the slot date.
    pub fn window(&self) -> TimeWindow {
        self.template.window
    }

    /// Where the shift takes place.
    pub fn location(&self) -> Option<&str> {
        self.template.location.as_deref()
    }

    /// Extra directions for the location.
    pub fn location_details(&self) -> Option<&str> {
        self.template.location_details.as_deref()
    }

    /// Seats available.
    pub fn max_participants(&self) -> u32 {
        self.template.max_participants
    }

    /// Seats needed for the shift to run.
    pub fn min_participants(&self) -> u32 {
        self.template.min_participants
    }

    /// Free-text notes.
    pub fn notes(&self) -> Option<&str> {
        self.template.notes.as_deref()
    }

    /// Whether the slot was cancelled by hand.
    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }

    /// Local wall-clock instant the shift begins.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.template.window.start())
    }

    /// Local wall-clock instant the shift ends.
    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.template.window.end())
    }

    /// Apply the manual cancel override.
    pub fn cancel(&self) -> Result<Self, SlotValidationError> {
        if self.is_cancelled {
            return Err(SlotValidationError::AlreadyCancelled);
        }
        let mut cancelled = self.clone();
        cancelled.is_cancelled = true;
        Ok(cancelled)
    }
}

/// A slot read together with its schedule summary and current occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSlot {
    pub slot: Slot,
    pub schedule: ScheduleSummary,
    pub occupancy: u32,
}

impl ScheduledSlot {
    /// Status at local time `now`.
    pub fn status(&self, now: NaiveDateTime) -> SlotStatus {
        SlotStatus::derive(&self.slot, self.occupancy, now)
    }

    /// Attach the derived status for presentation.
    pub fn into_view(self, now: NaiveDateTime) -> SlotView {
        let status = self.status(now);
        SlotView {
            slot: self.slot,
            schedule: self.schedule,
            occupancy: self.occupancy,
            status,
        }
    }
}

/// Calendar listing entry: slot, owning schedule, occupancy, and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    #[serde(flatten)]
    pub slot: Slot,
    pub schedule: ScheduleSummary,
    pub occupancy: u32,
    pub status: SlotStatus,
}
