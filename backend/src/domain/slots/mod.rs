//! Dated shift slots, their batch generator, and derived status.
//!
//! A slot's operational status is never stored. Only the manual `cancelled`
//! override is persisted; everything else is derived from occupancy and the
//! current local time by [`SlotStatus::derive`].

use std::fmt;

use crate::domain::CalendarValidationError;

mod generator;
mod slot;
mod status;

pub use generator::SlotBatch;
pub use slot::{ScheduledSlot, Slot, SlotTemplate, SlotTemplateDraft, SlotView};
pub use status::SlotStatus;

/// Largest seat count a slot may offer; matches the `INTEGER` column.
pub const MAX_SEATS: u32 = i32::MAX.unsigned_abs();

/// Validation errors raised by slot constructors and the cancel override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValidationError {
    /// The name was blank.
    EmptyName,
    /// The time window is invalid.
    Window(CalendarValidationError),
    /// No seats were offered.
    ZeroCapacity,
    /// More seats were offered than [`MAX_SEATS`].
    CapacityTooLarge { max: u32 },
    /// More seats are required than offered.
    MinimumExceedsCapacity { min: u32, max: u32 },
    /// The slot was cancelled before.
    AlreadyCancelled,
}

impl fmt::Display for SlotValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "slot name must not be blank"),
            Self::Window(err) => write!(f, "slot time window is invalid: {err}"),
            Self::ZeroCapacity => write!(f, "slot max participants must be at least 1"),
            Self::CapacityTooLarge { max } => write!(
                f,
                "slot max participants {max} exceeds the limit of {MAX_SEATS}"
            ),
            Self::MinimumExceedsCapacity { min, max } => write!(
                f,
                "slot min participants {min} must not exceed max participants {max}"
            ),
            Self::AlreadyCancelled => write!(f, "slot is already cancelled"),
        }
    }
}

impl std::error::Error for SlotValidationError {}

impl From<CalendarValidationError> for SlotValidationError {
    fn from(value: CalendarValidationError) -> Self {
        Self::Window(value)
    }
}
