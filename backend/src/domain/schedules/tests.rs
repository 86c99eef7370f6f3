//! Regression coverage for schedule domain types.

use chrono::{NaiveDate, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::{
    RecurringPattern, Schedule, ScheduleCategory, ScheduleDraft, ScheduleKind, ScheduleStatus,
    ScheduleValidationError,
};
use crate::domain::{DaySet, ScheduleId};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[fixture]
fn draft() -> ScheduleDraft {
    ScheduleDraft {
        id: ScheduleId::random(),
        name: "  Morning watch  ".to_owned(),
        description: Some("   ".to_owned()),
        kind: ScheduleKind::Weekly,
        category: ScheduleCategory::Vigilance,
        start_date: date(2025, 3, 1),
        end_date: Some(date(2025, 3, 31)),
        is_recurring: true,
        recurring_pattern: Some(RecurringPattern {
            days_of_week: DaySet::from_indices([1]).expect("valid days"),
            window: None,
        }),
        territory_scope: Some("north".to_owned()),
        color: None,
        created_by: None,
        created_at: Utc
            .with_ymd_and_hms(2025, 2, 20, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

#[rstest]
fn new_schedule_starts_in_draft_with_trimmed_fields(draft: ScheduleDraft) {
    let schedule = Schedule::new(draft).expect("valid schedule");

    assert_eq!(schedule.status(), ScheduleStatus::Draft);
    assert_eq!(schedule.name(), "Morning watch");
    assert_eq!(schedule.description(), None);
    assert_eq!(schedule.territory_scope(), Some("north"));
}

#[rstest]
fn blank_name_is_rejected(mut draft: ScheduleDraft) {
    draft.name = " \t".to_owned();
    assert_eq!(Schedule::new(draft), Err(ScheduleValidationError::EmptyName));
}

#[rstest]
fn end_before_start_is_rejected(mut draft: ScheduleDraft) {
    draft.end_date = Some(date(2025, 2, 28));
    assert_eq!(
        Schedule::new(draft),
        Err(ScheduleValidationError::EndBeforeStart {
            start: date(2025, 3, 1),
            end: date(2025, 2, 28),
        })
    );
}

#[rstest]
fn single_day_schedule_is_allowed(mut draft: ScheduleDraft) {
    draft.end_date = Some(draft.start_date);
    assert!(Schedule::new(draft).is_ok());
}

#[rstest]
#[case(date(2025, 2, 28), false)]
#[case(date(2025, 3, 1), true)]
#[case(date(2025, 3, 31), true)]
#[case(date(2025, 4, 1), false)]
fn covers_is_inclusive(draft: ScheduleDraft, #[case] on: NaiveDate, #[case] expected: bool) {
    let schedule = Schedule::new(draft).expect("valid schedule");
    assert_eq!(schedule.covers(on), expected);
}

#[rstest]
fn open_ended_schedule_covers_the_future(mut draft: ScheduleDraft) {
    draft.end_date = None;
    let schedule = Schedule::new(draft).expect("valid schedule");
    assert!(schedule.covers(date(2030, 1, 1)));
}

#[rstest]
fn permanent_schedule_with_end_date_is_flagged(mut draft: ScheduleDraft) {
    draft.kind = ScheduleKind::Permanent;
    let schedule = Schedule::new(draft).expect("advisory only");
    assert!(schedule.has_unexpected_end_date());
}

#[rstest]
#[case(ScheduleStatus::Draft, ScheduleStatus::Active)]
#[case(ScheduleStatus::Draft, ScheduleStatus::Cancelled)]
#[case(ScheduleStatus::Active, ScheduleStatus::Cancelled)]
#[case(ScheduleStatus::Active, ScheduleStatus::Completed)]
#[case(ScheduleStatus::Cancelled, ScheduleStatus::Active)]
fn allowed_transitions(
    draft: ScheduleDraft,
    #[case] from: ScheduleStatus,
    #[case] to: ScheduleStatus,
) {
    let schedule = Schedule::with_status(draft, from).expect("valid schedule");
    let moved = schedule.transition_to(to).expect("allowed transition");
    assert_eq!(moved.status(), to);
    assert_eq!(schedule.status(), from);
}

#[rstest]
#[case(ScheduleStatus::Completed, ScheduleStatus::Active)]
#[case(ScheduleStatus::Cancelled, ScheduleStatus::Draft)]
#[case(ScheduleStatus::Active, ScheduleStatus::Draft)]
#[case(ScheduleStatus::Draft, ScheduleStatus::Completed)]
fn forbidden_transitions(
    draft: ScheduleDraft,
    #[case] from: ScheduleStatus,
    #[case] to: ScheduleStatus,
) {
    let schedule = Schedule::with_status(draft, from).expect("valid schedule");
    assert_eq!(
        schedule.transition_to(to),
        Err(ScheduleValidationError::IllegalStatusChange { from, to })
    );
}

#[rstest]
fn same_status_is_reported_as_unchanged(draft: ScheduleDraft) {
    let schedule = Schedule::new(draft).expect("valid schedule");
    assert_eq!(
        schedule.transition_to(ScheduleStatus::Draft),
        Err(ScheduleValidationError::StatusUnchanged {
            status: ScheduleStatus::Draft
        })
    );
}

#[rstest]
fn serialises_with_camel_case_keys(draft: ScheduleDraft) {
    let schedule = Schedule::new(draft).expect("valid schedule");
    let value = serde_json::to_value(&schedule).expect("schedule serialises");

    assert_eq!(value["startDate"], "2025-03-01");
    assert_eq!(value["kind"], "weekly");
    assert_eq!(value["recurringPattern"]["daysOfWeek"], serde_json::json!([1]));
}
