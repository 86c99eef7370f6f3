//! Driving port for slot reads with derived status.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Error, SlotId, SlotView};

/// Driving port for reading slots with their derived status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotQuery: Send + Sync {
    /// One slot with schedule info, occupancy, and derived status.
    async fn get_slot(&self, slot_id: &SlotId) -> Result<SlotView, Error>;

    /// Slots dated within `[start, end]` with schedule info, occupancy, and
    /// status derived at call time.
    async fn get_slots_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SlotView>, Error>;
}
