//! Calendar primitives shared by schedules, slots, and availability.
//!
//! Shifts follow a same-day model: a [`TimeWindow`] always has `start < end`
//! and never wraps past midnight. Weekdays are numbered 0 (Sunday) through 6
//! (Saturday).

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Validation errors raised by calendar constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarValidationError {
    /// The start time is not before the end time.
    WindowNotOrdered { start: NaiveTime, end: NaiveTime },
    /// The weekday index is above 6.
    DayOutOfRange { day: u8 },
}

impl fmt::Display for CalendarValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowNotOrdered { start, end } => write!(
                f,
                "start time {} must be before end time {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
            Self::DayOutOfRange { day } => {
                write!(f, "day of week must be between 0 and 6 (got {day})")
            }
        }
    }
}

impl std::error::Error for CalendarValidationError {}

/// Convert a 0 (Sunday) to 6 (Saturday) index into a [`Weekday`].
///
/// # Examples
/// ```
/// use chrono::Weekday;
/// use scheduling::domain::weekday_from_index;
///
/// assert_eq!(weekday_from_index(0), Ok(Weekday::Sun));
/// assert!(weekday_from_index(7).is_err());
/// ```
pub fn weekday_from_index(day: u8) -> Result<Weekday, CalendarValidationError> {
    match day {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        _ => Err(CalendarValidationError::DayOutOfRange { day }),
    }
}

/// Index of a weekday, 0 for Sunday through 6 for Saturday.
pub fn weekday_index(weekday: Weekday) -> u8 {
    match weekday {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

/// Plural English label used in human-readable matching reasons.
pub(crate) fn weekday_plural(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sundays",
        Weekday::Mon => "Mondays",
        Weekday::Tue => "Tuesdays",
        Weekday::Wed => "Wednesdays",
        Weekday::Thu => "Thursdays",
        Weekday::Fri => "Fridays",
        Weekday::Sat => "Saturdays",
    }
}

/// A same-day half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeWindowDraft", into = "TimeWindowDraft")]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

/// Unvalidated wire shape of a [`TimeWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindowDraft {
    /// Inclusive start.
    pub start: NaiveTime,
    /// Exclusive end.
    pub end: NaiveTime,
}

impl TryFrom<TimeWindowDraft> for TimeWindow {
    type Error = CalendarValidationError;

    fn try_from(value: TimeWindowDraft) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl From<TimeWindow> for TimeWindowDraft {
    fn from(value: TimeWindow) -> Self {
        Self {
            start: value.start,
            end: value.end,
        }
    }
}

impl TimeWindow {
    /// Create a validated window.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveTime;
    /// use scheduling::domain::TimeWindow;
    ///
    /// let eight = NaiveTime::from_hms_opt(8, 0, 0).expect("valid time");
    /// let noon = NaiveTime::from_hms_opt(12, 0, 0).expect("valid time");
    /// assert!(TimeWindow::new(eight, noon).is_ok());
    /// assert!(TimeWindow::new(noon, eight).is_err());
    /// ```
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, CalendarValidationError> {
        if start >= end {
            return Err(CalendarValidationError::WindowNotOrdered { start, end });
        }
        Ok(Self { start, end })
    }

    /// Inclusive start time.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Exclusive end time.
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Length of the window in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether the two windows share any instant.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies entirely within this window.
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The shared part of two windows, if any.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        Self::new(start, end).ok()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// A set of weekdays stored as a bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Build a set from 0 (Sunday) to 6 (Saturday) indices.
    ///
    /// # Examples
    /// ```
    /// use chrono::Weekday;
    /// use scheduling::domain::DaySet;
    ///
    /// let days = DaySet::from_indices([1, 3, 5]).expect("valid days");
    /// assert!(days.contains(Weekday::Wed));
    /// assert!(!days.contains(Weekday::Tue));
    /// ```
    pub fn from_indices(
        days: impl IntoIterator<Item = u8>,
    ) -> Result<Self, CalendarValidationError> {
        let mut mask = 0_u8;
        for day in days {
            let weekday = weekday_from_index(day)?;
            mask |= 1 << weekday_index(weekday);
        }
        Ok(Self(mask))
    }

    /// Whether the weekday is part of the set.
    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday_index(weekday)) != 0
    }

    /// Whether no weekday is selected.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Selected weekday indices in ascending order.
    pub fn indices(&self) -> Vec<u8> {
        (0..7).filter(|day| self.0 & (1 << day) != 0).collect()
    }
}

impl Serialize for DaySet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.indices().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DaySet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let days = Vec::<u8>::deserialize(deserializer)?;
        Self::from_indices(days).map_err(serde::de::Error::custom)
    }
}

/// Every date in `[start, end]` whose weekday is in `days`, in order.
///
/// An inverted range or an empty day set yields no dates.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use scheduling::domain::{DaySet, dates_matching};
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 6).expect("valid date");
/// let end = NaiveDate::from_ymd_opt(2025, 1, 12).expect("valid date");
/// let days = DaySet::from_indices([1, 3, 5]).expect("valid days");
/// assert_eq!(dates_matching(start, end, days).len(), 3);
/// ```
pub fn dates_matching(start: NaiveDate, end: NaiveDate, days: DaySet) -> Vec<NaiveDate> {
    if days.is_empty() {
        return Vec::new();
    }
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| days.contains(date.weekday()))
        .collect()
}
