//! Date-scoped availability overrides.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::domain::enum_macros::define_string_enum;
use crate::domain::{ExceptionId, MemberId, TimeWindow};

use super::AvailabilityValidationError;

define_string_enum! {
    /// Direction of an exception.
    pub enum ExceptionKind as "exception kind" {
        Unavailable => "unavailable",
        Available => "available",
    }
}

/// Input payload for [`ScheduleException::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleExceptionDraft {
    pub id: ExceptionId,
    pub member_id: MemberId,
    pub date: NaiveDate,
    pub kind: ExceptionKind,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
}

/// Override of a member's weekly pattern on one date.
///
/// A missing window means the whole day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleException {
    id: ExceptionId,
    member_id: MemberId,
    date: NaiveDate,
    kind: ExceptionKind,
    window: Option<TimeWindow>,
    reason: Option<String>,
}

impl ScheduleException {
    /// Validate the optional window.
    pub fn new(draft: ScheduleExceptionDraft) -> Result<Self, AvailabilityValidationError> {
        let window = match (draft.start_time, draft.end_time) {
            (None, None) => None,
            (Some(start), Some(end)) => Some(TimeWindow::new(start, end)?),
            _ => return Err(AvailabilityValidationError::PartialExceptionWindow),
        };

        Ok(Self {
            id: draft.id,
            member_id: draft.member_id,
            date: draft.date,
            kind: draft.kind,
            window,
            reason: draft
                .reason
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty()),
        })
    }

    /// Stable exception identifier.
    pub fn id(&self) -> ExceptionId {
        self.id
    }

    /// Member the exception belongs to.
    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    /// Date the exception overrides.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Whether the exception blocks or opens time.
    pub fn kind(&self) -> ExceptionKind {
        self.kind
    }

    /// Hours affected; `None` means the whole day.
    pub fn window(&self) -> Option<TimeWindow> {
        self.window
    }

    /// Why the exception was added.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Whether the exception touches `slot` on its date.
    pub fn affects(&self, date: NaiveDate, slot: &TimeWindow) -> bool {
        self.date == date && self.window.is_none_or(|window| window.overlaps(slot))
    }

    /// Short text used in candidate reasons.
    pub fn describe(&self) -> String {
        let span = self
            .window
            .map_or_else(|| "all day".to_owned(), |window| window.to_string());
        match &self.reason {
            Some(reason) => format!("{} on {} {span} ({reason})", self.kind, self.date),
            None => format!("{} on {} {span}", self.kind, self.date),
        }
    }
}
