//! Port for slot persistence and calendar reads.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{ScheduledSlot, Slot, SlotId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by slot repository adapters.
    pub enum SlotRepositoryError for "slot repository" {
        /// The owning schedule disappeared before the slots were written.
        MissingSchedule { schedule_id: String } =>
            "schedule {schedule_id} does not exist",
    }
}

/// Port for writing slots and reading them with occupancy.
///
/// Occupancy counts assignments whose status holds a seat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Insert every slot or none of them.
    async fn insert_many(&self, slots: &[Slot]) -> Result<(), SlotRepositoryError>;

    async fn find_by_id(
        &self,
        slot_id: &SlotId,
    ) -> Result<Option<ScheduledSlot>, SlotRepositoryError>;

    /// Slots dated within `[start, end]`, ordered by date then start time.
    async fn list_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduledSlot>, SlotRepositoryError>;

    /// Delete a slot and its assignments; `false` when it did not exist.
    async fn delete(&self, slot_id: &SlotId) -> Result<bool, SlotRepositoryError>;

    /// Set the cancel override if it is not already set.
    ///
    /// Returns `false` when the slot is missing or was cancelled already.
    async fn mark_cancelled(&self, slot_id: &SlotId) -> Result<bool, SlotRepositoryError>;
}
