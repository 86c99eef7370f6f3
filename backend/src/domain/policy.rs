//! Runtime policy shared by the scheduling services.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};

use crate::domain::enum_macros::define_string_enum;

define_string_enum! {
    /// What `assign` does when a slot is already at capacity.
    pub enum CapacityPolicy as "capacity policy" {
        /// Fail with `capacity_exceeded`.
        Reject => "reject",
        /// Allow overbooking and flag the result.
        Warn => "warn",
    }
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self::Reject
    }
}

/// Knobs the services consult on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingPolicy {
    /// How a full slot treats another booking.
    pub capacity_policy: CapacityPolicy,
    /// Offset of the organisation's wall clock from UTC.
    ///
    /// Fixed for the life of the policy; daylight saving is not applied.
    pub utc_offset: FixedOffset,
    /// Capacity used when a creation path omits one.
    pub default_max_participants: u32,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            capacity_policy: CapacityPolicy::default(),
            utc_offset: Utc.fix(),
            default_max_participants: 1,
        }
    }
}

impl SchedulingPolicy {
    /// Convert a UTC instant to local wall-clock time for slot comparisons.
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.utc_offset).naive_local()
    }
}
