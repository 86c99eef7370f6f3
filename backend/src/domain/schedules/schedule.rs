//! Schedule entity, its closed enumerations, and status transitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::enum_macros::define_string_enum;
use crate::domain::{ActorId, DaySet, ScheduleId, TimeWindow};

use super::ScheduleValidationError;

define_string_enum! {
    /// How a schedule recurs.
    pub enum ScheduleKind as "schedule kind" {
        /// Repeats every week.
        Weekly => "weekly",
        /// Repeats every month.
        Monthly => "monthly",
        /// A one-off event.
        Event => "event",
        /// Open-ended standing rota.
        Permanent => "permanent",
    }
}

define_string_enum! {
    /// Organisational category tag.
    pub enum ScheduleCategory as "schedule category" {
        Vigilance => "vigilance",
        Training => "training",
        Agitation => "agitation",
        Administrative => "administrative",
        Finance => "finance",
        Other => "other",
    }
}

define_string_enum! {
    /// Lifecycle state of a schedule.
    pub enum ScheduleStatus as "schedule status" {
        /// Created but not yet published.
        Draft => "draft",
        /// Accepting assignments.
        Active => "active",
        /// Finished.
        Completed => "completed",
        /// Withdrawn; may be reactivated.
        Cancelled => "cancelled",
    }
}

impl ScheduleStatus {
    /// Whether an explicit status change from `self` to `next` is allowed.
    ///
    /// `active` and `cancelled` toggle freely; `completed` is terminal.
    pub fn can_move_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Active)
                | (Self::Draft, Self::Cancelled)
                | (Self::Active, Self::Cancelled)
                | (Self::Active, Self::Completed)
                | (Self::Cancelled, Self::Active)
        )
    }
}

/// Structured recurrence hint stored alongside a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPattern {
    pub days_of_week: DaySet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
}

/// Input payload for [`Schedule::new`].
#[derive(Debug, Clone)]
pub struct ScheduleDraft {
    pub id: ScheduleId,
    pub name: String,
    pub description: Option<String>,
    pub kind: ScheduleKind,
    pub category: ScheduleCategory,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_recurring: bool,
    pub recurring_pattern: Option<RecurringPattern>,
    pub territory_scope: Option<String>,
    pub color: Option<String>,
    pub created_by: Option<ActorId>,
    pub created_at: DateTime<Utc>,
}

/// A named recurring or one-off work plan.
///
/// ## Invariants
/// - `name` is non-blank.
/// - `end_date`, when present, is not before `start_date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    id: ScheduleId,
    name: String,
    description: Option<String>,
    kind: ScheduleKind,
    category: ScheduleCategory,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    is_recurring: bool,
    recurring_pattern: Option<RecurringPattern>,
    territory_scope: Option<String>,
    status: ScheduleStatus,
    color: Option<String>,
    created_by: Option<ActorId>,
    created_at: DateTime<Utc>,
}

fn normalise_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

impl Schedule {
    /// Create a validated schedule in `draft`.
    pub fn new(draft: ScheduleDraft) -> Result<Self, ScheduleValidationError> {
        Self::with_status(draft, ScheduleStatus::Draft)
    }

    /// Rebuild a persisted schedule with its stored status.
    pub fn with_status(
        draft: ScheduleDraft,
        status: ScheduleStatus,
    ) -> Result<Self, ScheduleValidationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ScheduleValidationError::EmptyName);
        }
        if let Some(end) = draft.end_date.filter(|end| *end < draft.start_date) {
            return Err(ScheduleValidationError::EndBeforeStart {
                start: draft.start_date,
                end,
            });
        }

        Ok(Self {
            id: draft.id,
            name: name.to_owned(),
            description: normalise_optional(draft.description),
            kind: draft.kind,
            category: draft.category,
            start_date: draft.start_date,
            end_date: draft.end_date,
            is_recurring: draft.is_recurring,
            recurring_pattern: draft.recurring_pattern,
            territory_scope: normalise_optional(draft.territory_scope),
            status,
            color: normalise_optional(draft.color),
            created_by: draft.created_by,
            created_at: draft.created_at,
        })
    }

    /// Stable schedule identifier.
    pub fn id(&self) -> ScheduleId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Free-text description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Cadence of the schedule.
    pub fn kind(&self) -> ScheduleKind {
        self.kind
    }

    /// What the schedule covers.
    pub fn category(&self) -> ScheduleCategory {
        self.category
    }

    /// First day the schedule covers.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last covered date; `None` means open-ended.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Whether the schedule repeats.
    pub fn is_recurring(&self) -> bool {
        self.is_recurring
    }

    /// Repetition rule for recurring schedules.
    pub fn recurring_pattern(&self) -> Option<&RecurringPattern> {
        self.recurring_pattern.as_ref()
    }

    /// Free-form region tag.
    pub fn territory_scope(&self) -> Option<&str> {
        self.territory_scope.as_deref()
    }

    /// Lifecycle status.
    pub fn status(&self) -> ScheduleStatus {
        self.status
    }

    /// Presentation colour; not interpreted by the core.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Administrator who created the schedule.
    pub fn created_by(&self) -> Option<ActorId> {
        self.created_by
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `date` falls inside `[start_date, end_date]`.
    ///
    /// # Examples
    /// ```rust,ignore
    /// # let schedule = sample_schedule_for_march_2025();
    /// let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date");
    /// assert!(schedule.covers(date));
    /// ```
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.is_none_or(|end| date <= end)
    }

    /// A `permanent` schedule is expected to be open-ended.
    pub fn has_unexpected_end_date(&self) -> bool {
        self.kind == ScheduleKind::Permanent && self.end_date.is_some()
    }

    /// Return a copy moved to `next`, enforcing the transition table.
    pub fn transition_to(&self, next: ScheduleStatus) -> Result<Self, ScheduleValidationError> {
        if self.status == next {
            return Err(ScheduleValidationError::StatusUnchanged { status: next });
        }
        if !self.status.can_move_to(next) {
            return Err(ScheduleValidationError::IllegalStatusChange {
                from: self.status,
                to: next,
            });
        }
        let mut moved = self.clone();
        moved.status = next;
        Ok(moved)
    }

    /// Lightweight projection embedded in slot listings.
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            id: self.id,
            name: self.name.clone(),
            category: self.category,
            status: self.status,
            color: self.color.clone(),
        }
    }
}

/// Schedule fields shown next to each slot in calendar views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub id: ScheduleId,
    pub name: String,
    pub category: ScheduleCategory,
    pub status: ScheduleStatus,
    pub color: Option<String>,
}
