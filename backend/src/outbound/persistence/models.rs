//! Internal Diesel row structs and their conversions to domain values.
//!
//! Rows never leave the persistence layer. Reading a row goes back through
//! the domain's validating constructors, so a corrupt row surfaces as a
//! [`RowError`] instead of an invalid entity.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    ActorId, Assignment, AssignmentId, AssignmentParts, AvailabilityId, ExceptionId, Member,
    MemberAvailability, MemberAvailabilityDraft, MemberId, RecurringPattern, Schedule,
    ScheduleDraft, ScheduleException, ScheduleExceptionDraft, ScheduleId, ScheduleSummary, Slot,
    SlotId, SlotTemplate, SlotTemplateDraft, weekday_index,
};

use super::schema::{
    assignments, member_availability, members, schedule_exceptions, schedules, slots,
};

/// A stored row that no longer satisfies the domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {table} row: {message}")]
pub(crate) struct RowError {
    table: &'static str,
    message: String,
}

impl RowError {
    fn new(table: &'static str, message: impl ToString) -> Self {
        Self {
            table,
            message: message.to_string(),
        }
    }
}

fn parse_column<T>(table: &'static str, raw: &str) -> Result<T, RowError>
where
    T: std::str::FromStr,
    T::Err: ToString,
{
    raw.parse().map_err(|err| RowError::new(table, err))
}

fn count_column(table: &'static str, value: i32) -> Result<u32, RowError> {
    u32::try_from(value).map_err(|_| RowError::new(table, format!("negative count {value}")))
}

/// Seat counts are capped at `MAX_SEATS` when the slot is built.
fn count_value(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MemberRow {
    pub id: Uuid,
    pub full_name: String,
}

impl TryFrom<MemberRow> for Member {
    type Error = RowError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Member::new(MemberId::from_uuid(row.id), row.full_name)
            .map_err(|err| RowError::new("members", err))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = members)]
pub(crate) struct NewMemberRow<'a> {
    pub id: Uuid,
    pub full_name: &'a str,
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScheduleRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_recurring: bool,
    pub recurring_pattern: Option<serde_json::Value>,
    pub territory_scope: Option<String>,
    pub status: String,
    pub color: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = RowError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        const TABLE: &str = "schedules";
        let recurring_pattern = row
            .recurring_pattern
            .map(serde_json::from_value::<RecurringPattern>)
            .transpose()
            .map_err(|err| RowError::new(TABLE, err))?;
        let draft = ScheduleDraft {
            id: ScheduleId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            kind: parse_column(TABLE, &row.kind)?,
            category: parse_column(TABLE, &row.category)?,
            start_date: row.start_date,
            end_date: row.end_date,
            is_recurring: row.is_recurring,
            recurring_pattern,
            territory_scope: row.territory_scope,
            color: row.color,
            created_by: row.created_by.map(ActorId::from_uuid),
            created_at: row.created_at,
        };
        Schedule::with_status(draft, parse_column(TABLE, &row.status)?)
            .map_err(|err| RowError::new(TABLE, err))
    }
}

/// The schedule columns embedded in every slot read.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScheduleSummaryRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub status: String,
    pub color: Option<String>,
}

impl TryFrom<ScheduleSummaryRow> for ScheduleSummary {
    type Error = RowError;

    fn try_from(row: ScheduleSummaryRow) -> Result<Self, Self::Error> {
        Ok(ScheduleSummary {
            id: ScheduleId::from_uuid(row.id),
            name: row.name,
            category: parse_column("schedules", &row.category)?,
            status: parse_column("schedules", &row.status)?,
            color: row.color,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schedules)]
pub(crate) struct NewScheduleRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub kind: &'static str,
    pub category: &'static str,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_recurring: bool,
    pub recurring_pattern: Option<serde_json::Value>,
    pub territory_scope: Option<&'a str>,
    pub status: &'static str,
    pub color: Option<&'a str>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewScheduleRow<'a> {
    /// Borrow a schedule as an insertable row; the recurring pattern becomes JSON.
    pub fn from_schedule(schedule: &'a Schedule) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: *schedule.id().as_uuid(),
            name: schedule.name(),
            description: schedule.description(),
            kind: schedule.kind().as_str(),
            category: schedule.category().as_str(),
            start_date: schedule.start_date(),
            end_date: schedule.end_date(),
            is_recurring: schedule.is_recurring(),
            recurring_pattern: schedule
                .recurring_pattern()
                .map(serde_json::to_value)
                .transpose()?,
            territory_scope: schedule.territory_scope(),
            status: schedule.status().as_str(),
            color: schedule.color(),
            created_by: schedule.created_by().map(|actor| *actor.as_uuid()),
            created_at: schedule.created_at(),
        })
    }
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SlotRow {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: Option<String>,
    pub location_details: Option<String>,
    pub max_participants: i32,
    pub min_participants: i32,
    pub notes: Option<String>,
    pub is_cancelled: bool,
}

impl TryFrom<SlotRow> for Slot {
    type Error = RowError;

    fn try_from(row: SlotRow) -> Result<Self, Self::Error> {
        const TABLE: &str = "slots";
        let template = SlotTemplate::new(SlotTemplateDraft {
            name: row.name,
            start_time: row.start_time,
            end_time: row.end_time,
            location: row.location,
            location_details: row.location_details,
            max_participants: count_column(TABLE, row.max_participants)?,
            min_participants: count_column(TABLE, row.min_participants)?,
            notes: row.notes,
        })
        .map_err(|err| RowError::new(TABLE, err))?;
        Ok(Slot::restore(
            SlotId::from_uuid(row.id),
            ScheduleId::from_uuid(row.schedule_id),
            row.date,
            template,
            row.is_cancelled,
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = slots)]
pub(crate) struct NewSlotRow<'a> {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub name: &'a str,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: Option<&'a str>,
    pub location_details: Option<&'a str>,
    pub max_participants: i32,
    pub min_participants: i32,
    pub notes: Option<&'a str>,
    pub is_cancelled: bool,
}

impl<'a> From<&'a Slot> for NewSlotRow<'a> {
    fn from(slot: &'a Slot) -> Self {
        let window = slot.window();
        Self {
            id: *slot.id().as_uuid(),
            schedule_id: *slot.schedule_id().as_uuid(),
            name: slot.name(),
            date: slot.date(),
            start_time: window.start(),
            end_time: window.end(),
            location: slot.location(),
            location_details: slot.location_details(),
            max_participants: count_value(slot.max_participants()),
            min_participants: count_value(slot.min_participants()),
            notes: slot.notes(),
            is_cancelled: slot.is_cancelled(),
        }
    }
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AssignmentRow {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub member_id: Uuid,
    pub assigned_by: Option<Uuid>,
    pub role: String,
    pub status: String,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub decline_reason: Option<String>,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AssignmentRow> for Assignment {
    type Error = RowError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        const TABLE: &str = "assignments";
        Ok(Assignment::from_parts(AssignmentParts {
            id: AssignmentId::from_uuid(row.id),
            slot_id: SlotId::from_uuid(row.slot_id),
            member_id: MemberId::from_uuid(row.member_id),
            assigned_by: row.assigned_by.map(ActorId::from_uuid),
            role: parse_column(TABLE, &row.role)?,
            status: parse_column(TABLE, &row.status)?,
            confirmed_at: row.confirmed_at,
            decline_reason: row.decline_reason,
            check_in_at: row.check_in_at,
            check_out_at: row.check_out_at,
            notes: row.notes,
            created_at: row.created_at,
        }))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assignments)]
pub(crate) struct NewAssignmentRow<'a> {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub member_id: Uuid,
    pub assigned_by: Option<Uuid>,
    pub role: &'static str,
    pub status: &'static str,
    pub notes: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Assignment> for NewAssignmentRow<'a> {
    fn from(assignment: &'a Assignment) -> Self {
        Self {
            id: *assignment.id().as_uuid(),
            slot_id: *assignment.slot_id().as_uuid(),
            member_id: *assignment.member_id().as_uuid(),
            assigned_by: assignment.assigned_by().map(|actor| *actor.as_uuid()),
            role: assignment.role().as_str(),
            status: assignment.status().as_str(),
            notes: assignment.notes(),
            created_at: assignment.created_at(),
        }
    }
}

/// Lifecycle columns written by a status transition.
///
/// `treat_none_as_null` so clearing a timestamp is persisted.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = assignments)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AssignmentTransitionRow<'a> {
    pub status: &'static str,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub decline_reason: Option<&'a str>,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Assignment> for AssignmentTransitionRow<'a> {
    fn from(assignment: &'a Assignment) -> Self {
        Self {
            status: assignment.status().as_str(),
            confirmed_at: assignment.confirmed_at(),
            decline_reason: assignment.decline_reason(),
            check_in_at: assignment.check_in_at(),
            check_out_at: assignment.check_out_at(),
        }
    }
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = member_availability)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AvailabilityRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl TryFrom<AvailabilityRow> for MemberAvailability {
    type Error = RowError;

    fn try_from(row: AvailabilityRow) -> Result<Self, Self::Error> {
        const TABLE: &str = "member_availability";
        let day_of_week = u8::try_from(row.day_of_week)
            .map_err(|_| RowError::new(TABLE, format!("weekday {}", row.day_of_week)))?;
        MemberAvailability::new(MemberAvailabilityDraft {
            id: AvailabilityId::from_uuid(row.id),
            member_id: MemberId::from_uuid(row.member_id),
            day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            is_available: row.is_available,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            notes: row.notes,
        })
        .map_err(|err| RowError::new(TABLE, err))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = member_availability)]
pub(crate) struct NewAvailabilityRow<'a> {
    pub id: Uuid,
    pub member_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a MemberAvailability> for NewAvailabilityRow<'a> {
    fn from(rule: &'a MemberAvailability) -> Self {
        let window = rule.window();
        Self {
            id: *rule.id().as_uuid(),
            member_id: *rule.member_id().as_uuid(),
            day_of_week: i16::from(weekday_index(rule.day_of_week())),
            start_time: window.start(),
            end_time: window.end(),
            is_available: rule.is_available(),
            valid_from: rule.valid_from(),
            valid_until: rule.valid_until(),
            notes: rule.notes(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schedule_exceptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExceptionRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub date: NaiveDate,
    pub kind: String,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
}

impl TryFrom<ExceptionRow> for ScheduleException {
    type Error = RowError;

    fn try_from(row: ExceptionRow) -> Result<Self, Self::Error> {
        const TABLE: &str = "schedule_exceptions";
        ScheduleException::new(ScheduleExceptionDraft {
            id: ExceptionId::from_uuid(row.id),
            member_id: MemberId::from_uuid(row.member_id),
            date: row.date,
            kind: parse_column(TABLE, &row.kind)?,
            start_time: row.start_time,
            end_time: row.end_time,
            reason: row.reason,
        })
        .map_err(|err| RowError::new(TABLE, err))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schedule_exceptions)]
pub(crate) struct NewExceptionRow<'a> {
    pub id: Uuid,
    pub member_id: Uuid,
    pub date: NaiveDate,
    pub kind: &'static str,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: Option<&'a str>,
}

impl<'a> From<&'a ScheduleException> for NewExceptionRow<'a> {
    fn from(exception: &'a ScheduleException) -> Self {
        let window = exception.window();
        Self {
            id: *exception.id().as_uuid(),
            member_id: *exception.member_id().as_uuid(),
            date: exception.date(),
            kind: exception.kind().as_str(),
            start_time: window.map(|window| window.start()),
            end_time: window.map(|window| window.end()),
            reason: exception.reason(),
        }
    }
}
