//! Derived slot status.

use chrono::NaiveDateTime;

use crate::domain::enum_macros::define_string_enum;

use super::Slot;

define_string_enum! {
    /// Operational state of a slot, derived on every read.
    pub enum SlotStatus as "slot status" {
        /// Seats remain and the shift has not started.
        Open => "open",
        /// Occupancy has reached capacity.
        Full => "full",
        /// The shift is under way.
        InProgress => "in_progress",
        /// The shift has ended.
        Completed => "completed",
        /// Manually cancelled; overrides every other state.
        Cancelled => "cancelled",
    }
}

impl SlotStatus {
    /// Highest-priority state among
    /// `cancelled > completed > in_progress > full > open`.
    ///
    /// `now` is local wall-clock time, comparable with the slot's date and
    /// window. The result depends only on the arguments.
    pub fn derive(slot: &Slot, occupancy: u32, now: NaiveDateTime) -> Self {
        if slot.is_cancelled() {
            Self::Cancelled
        } else if now > slot.ends_at() {
            Self::Completed
        } else if now >= slot.starts_at() {
            Self::InProgress
        } else if occupancy >= slot.max_participants() {
            Self::Full
        } else {
            Self::Open
        }
    }

    /// Whether new assignments may still be made.
    pub fn accepts_assignments(self) -> bool {
        !matches!(self, Self::Cancelled | Self::Completed)
    }
}
