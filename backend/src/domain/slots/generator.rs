//! Expansion of a weekday mask and shift template into dated slots.

use chrono::NaiveDate;

use crate::domain::{DaySet, ScheduleId, SlotId, dates_matching};

use super::{Slot, SlotTemplate};

/// A validated batch generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBatch {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_of_week: DaySet,
    pub template: SlotTemplate,
}

impl SlotBatch {
    /// Dates the batch would produce slots for, in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        dates_matching(self.start_date, self.end_date, self.days_of_week)
    }

    /// Produce one slot per matching date.
    ///
    /// An inverted range or an empty weekday set yields no slots. Identifiers
    /// are drawn from `next_id` in date order.
    pub fn expand(
        &self,
        schedule_id: ScheduleId,
        mut next_id: impl FnMut() -> SlotId,
    ) -> Vec<Slot> {
        self.dates()
            .into_iter()
            .map(|date| self.template.instantiate(next_id(), schedule_id, date))
            .collect()
    }
}
