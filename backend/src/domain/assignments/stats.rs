//! Per-member participation statistics.

use serde::Serialize;

use super::AssignmentStatus;

/// Aggregated assignment counts for one member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationStats {
    pub total: u32,
    pub attended: u32,
    pub absent: u32,
    pub excused: u32,
    pub pending: u32,
    pub confirmed: u32,
    pub declined: u32,
    /// Whole percentage of recorded outcomes that were attended.
    pub attendance_rate: u8,
}

impl ParticipationStats {
    /// Tally statuses and compute the attendance rate.
    ///
    /// The rate is `attended / (attended + absent + excused)` rounded half
    /// up, or 100 when no outcome has been recorded.
    ///
    /// # Examples
    /// ```
    /// use scheduling::domain::{AssignmentStatus, ParticipationStats};
    ///
    /// let stats = ParticipationStats::from_statuses([
    ///     AssignmentStatus::Attended,
    ///     AssignmentStatus::Attended,
    ///     AssignmentStatus::Absent,
    /// ]);
    /// assert_eq!(stats.attendance_rate, 67);
    /// ```
    pub fn from_statuses(statuses: impl IntoIterator<Item = AssignmentStatus>) -> Self {
        let mut stats = Self::default();
        for status in statuses {
            stats.total += 1;
            match status {
                AssignmentStatus::Pending => stats.pending += 1,
                AssignmentStatus::Confirmed => stats.confirmed += 1,
                AssignmentStatus::Declined => stats.declined += 1,
                AssignmentStatus::Attended => stats.attended += 1,
                AssignmentStatus::Absent => stats.absent += 1,
                AssignmentStatus::Excused => stats.excused += 1,
            }
        }
        stats.attendance_rate = attendance_rate(stats.attended, stats.absent, stats.excused);
        stats
    }
}

fn attendance_rate(attended: u32, absent: u32, excused: u32) -> u8 {
    let recorded = u64::from(attended) + u64::from(absent) + u64::from(excused);
    if recorded == 0 {
        return 100;
    }
    let rounded = (u64::from(attended) * 200 + recorded) / (recorded * 2);
    u8::try_from(rounded).unwrap_or(100)
}
