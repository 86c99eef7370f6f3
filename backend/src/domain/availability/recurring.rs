//! Weekly recurring availability rules.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Serialize, Serializer};

use crate::domain::calendar::weekday_plural;
use crate::domain::{
    AvailabilityId, MemberId, TimeWindow, weekday_from_index, weekday_index,
};

use super::AvailabilityValidationError;

/// Input payload for [`MemberAvailability::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAvailabilityDraft {
    pub id: AvailabilityId,
    pub member_id: MemberId,
    /// 0 (Sunday) through 6 (Saturday).
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// One weekly window in which a member is (or explicitly is not) available.
///
/// ## Invariants
/// - `window.start < window.end`.
/// - `valid_from <= valid_until` when both are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAvailability {
    id: AvailabilityId,
    member_id: MemberId,
    #[serde(serialize_with = "serialize_weekday")]
    day_of_week: Weekday,
    #[serde(flatten)]
    window: TimeWindow,
    is_available: bool,
    valid_from: Option<NaiveDate>,
    valid_until: Option<NaiveDate>,
    notes: Option<String>,
}

fn serialize_weekday<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(weekday_index(*weekday))
}

impl MemberAvailability {
    /// Validate the window and the validity range.
    pub fn new(draft: MemberAvailabilityDraft) -> Result<Self, AvailabilityValidationError> {
        let day_of_week = weekday_from_index(draft.day_of_week)?;
        let window = TimeWindow::new(draft.start_time, draft.end_time)?;
        if let (Some(from), Some(until)) = (draft.valid_from, draft.valid_until) {
            if until < from {
                return Err(AvailabilityValidationError::ValidityInverted { from, until });
            }
        }

        Ok(Self {
            id: draft.id,
            member_id: draft.member_id,
            day_of_week,
            window,
            is_available: draft.is_available,
            valid_from: draft.valid_from,
            valid_until: draft.valid_until,
            notes: draft
                .notes
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty()),
        })
    }

    /// Stable rule identifier.
    pub fn id(&self) -> AvailabilityId {
        self.id
    }

    /// Member the rule belongs to.
    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    /// Weekday the rule applies to.
    pub fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    /// Hours covered on that weekday.
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// `false` marks the window as blocked.
    pub fn is_available(&self) -> bool {
        self.is_available
    }

    /// First date the rule applies, if bounded.
    pub fn valid_from(&self) -> Option<NaiveDate> {
        self.valid_from
    }

    /// Last date the rule applies, if bounded.
    pub fn valid_until(&self) -> Option<NaiveDate> {
        self.valid_until
    }

    /// Free-text notes.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Whether the rule applies on `date`: same weekday, inside validity.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        date.weekday() == self.day_of_week
            && self.valid_from.is_none_or(|from| date >= from)
            && self.valid_until.is_none_or(|until| date <= until)
    }

    /// Human-readable reason, e.g. `available Tuesdays 08:00-12:00`.
    pub fn describe(&self) -> String {
        let verb = if self.is_available {
            "available"
        } else {
            "unavailable"
        };
        format!("{verb} {} {}", weekday_plural(self.day_of_week), self.window)
    }
}
