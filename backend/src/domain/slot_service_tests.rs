//! Tests for the slot service.

use std::sync::Arc;

use chrono::Weekday;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockScheduleRepository, MockSlotRepository, SlotRepositoryError};
use crate::domain::service_fixtures::{actor, clock_at, schedule, scheduled, time};
use crate::domain::{ErrorCode, ScheduleStatus, SlotStatus};
use crate::test_support::day;

type Service = SlotService<MockScheduleRepository, MockSlotRepository>;

fn make_service(
    schedules: MockScheduleRepository,
    slots: MockSlotRepository,
    hour: u32,
    policy: SchedulingPolicy,
) -> Service {
    SlotService::new(Arc::new(schedules), Arc::new(slots), clock_at(hour), policy)
}

fn schedules_returning(found: Option<Schedule>) -> MockScheduleRepository {
    let mut schedules = MockScheduleRepository::new();
    schedules
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(found));
    schedules
}

fn generate_request(schedule_id: ScheduleId, days: Vec<u8>) -> GenerateSlotsRequest {
    GenerateSlotsRequest {
        actor: actor(),
        schedule_id,
        start_date: day(2025, 3, 3),
        end_date: day(2025, 3, 9),
        days_of_week: days,
        start_time: time(8, 0),
        end_time: time(10, 0),
        name: "Gate".to_owned(),
        location: None,
        location_details: None,
        max_participants: Some(2),
        min_participants: None,
        notes: None,
    }
}

#[tokio::test]
async fn generate_writes_one_slot_per_matching_weekday_in_one_batch() {
    let owner = schedule(ScheduleStatus::Active);
    let schedule_id = owner.id();
    let mut slots = MockSlotRepository::new();
    slots
        .expect_insert_many()
        .withf(|batch| batch.len() == 3)
        .times(1)
        .return_once(|_| Ok(()));

    let generated = make_service(
        schedules_returning(Some(owner)),
        slots,
        6,
        SchedulingPolicy::default(),
    )
    .generate_slots(generate_request(schedule_id, vec![1, 3, 5]))
    .await
    .expect("slots generated");

    let weekdays: Vec<Weekday> = generated
        .iter()
        .map(|slot| chrono::Datelike::weekday(&slot.date()))
        .collect();
    assert_eq!(weekdays, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    assert!(generated.iter().all(|slot| slot.schedule_id() == schedule_id));
}

#[rstest]
#[case::no_weekdays(vec![], day(2025, 3, 3), day(2025, 3, 9))]
#[case::inverted_range(vec![1, 3], day(2025, 3, 9), day(2025, 3, 3))]
#[tokio::test]
async fn degenerate_batches_write_nothing(
    #[case] days: Vec<u8>,
    #[case] start_date: NaiveDate,
    #[case] end_date: NaiveDate,
) {
    let owner = schedule(ScheduleStatus::Active);
    let mut request = generate_request(owner.id(), days);
    request.start_date = start_date;
    request.end_date = end_date;
    let mut slots = MockSlotRepository::new();
    slots.expect_insert_many().times(0);

    let generated = make_service(
        schedules_returning(Some(owner)),
        slots,
        6,
        SchedulingPolicy::default(),
    )
    .generate_slots(request)
    .await
    .expect("empty batch is not an error");
    assert!(generated.is_empty());
}

#[tokio::test]
async fn an_invalid_template_fails_before_any_write() {
    let owner = schedule(ScheduleStatus::Active);
    let mut request = generate_request(owner.id(), vec![1]);
    request.start_time = time(10, 0);
    request.end_time = time(8, 0);
    let mut slots = MockSlotRepository::new();
    slots.expect_insert_many().times(0);

    let error = make_service(
        schedules_returning(Some(owner)),
        slots,
        6,
        SchedulingPolicy::default(),
    )
    .generate_slots(request)
    .await
    .expect_err("inverted window rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn seat_counts_beyond_the_store_range_are_rejected() {
    let owner = schedule(ScheduleStatus::Active);
    let mut request = generate_request(owner.id(), vec![1]);
    request.max_participants = Some(u32::MAX);
    let mut slots = MockSlotRepository::new();
    slots.expect_insert_many().times(0);

    let error = make_service(
        schedules_returning(Some(owner)),
        slots,
        6,
        SchedulingPolicy::default(),
    )
    .generate_slots(request)
    .await
    .expect_err("oversized capacity rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn an_out_of_range_weekday_is_rejected() {
    let owner = schedule(ScheduleStatus::Active);
    let request = generate_request(owner.id(), vec![1, 7]);
    let mut slots = MockSlotRepository::new();
    slots.expect_insert_many().times(0);

    let error = make_service(
        schedules_returning(Some(owner)),
        slots,
        6,
        SchedulingPolicy::default(),
    )
    .generate_slots(request)
    .await
    .expect_err("weekday 7 rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn generating_for_an_unknown_schedule_is_not_found() {
    let mut slots = MockSlotRepository::new();
    slots.expect_insert_many().times(0);

    let error = make_service(
        schedules_returning(None),
        slots,
        6,
        SchedulingPolicy::default(),
    )
    .generate_slots(generate_request(ScheduleId::random(), vec![1]))
    .await
    .expect_err("schedule missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn omitted_capacity_falls_back_to_the_configured_default() {
    let owner = schedule(ScheduleStatus::Active);
    let request = CreateSlotRequest {
        actor: actor(),
        schedule_id: owner.id(),
        name: "Stand".to_owned(),
        date: day(2025, 3, 4),
        start_time: time(14, 0),
        end_time: time(16, 0),
        location: None,
        location_details: None,
        max_participants: None,
        min_participants: None,
        notes: Some("bring leaflets".to_owned()),
    };
    let mut slots = MockSlotRepository::new();
    slots
        .expect_insert_many()
        .withf(|batch| batch.len() == 1)
        .times(1)
        .return_once(|_| Ok(()));
    let policy = SchedulingPolicy {
        default_max_participants: 4,
        ..SchedulingPolicy::default()
    };

    let created = make_service(schedules_returning(Some(owner)), slots, 6, policy)
        .create_slot(request)
        .await
        .expect("slot created");
    assert_eq!(created.max_participants(), 4);
    assert_eq!(created.notes(), Some("bring leaflets"));
}

#[tokio::test]
async fn a_failed_batch_write_surfaces_as_an_error() {
    let owner = schedule(ScheduleStatus::Active);
    let schedule_id = owner.id();
    let mut slots = MockSlotRepository::new();
    slots
        .expect_insert_many()
        .times(1)
        .return_once(|_| Err(SlotRepositoryError::query("constraint violated")));

    let error = make_service(
        schedules_returning(Some(owner)),
        slots,
        6,
        SchedulingPolicy::default(),
    )
    .generate_slots(generate_request(schedule_id, vec![1]))
    .await
    .expect_err("write failed");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn cancelling_sets_the_override_and_reports_cancelled() {
    let current = scheduled(2, 1);
    let slot_id = current.slot.id();
    let mut slots = MockSlotRepository::new();
    slots
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(current)));
    slots
        .expect_mark_cancelled()
        .withf(move |id| *id == slot_id)
        .times(1)
        .return_once(|_| Ok(true));

    let view = make_service(
        MockScheduleRepository::new(),
        slots,
        6,
        SchedulingPolicy::default(),
    )
    .cancel_slot(SlotActionRequest {
        actor: actor(),
        slot_id,
    })
    .await
    .expect("slot cancelled");
    assert_eq!(view.status, SlotStatus::Cancelled);
    assert_eq!(view.occupancy, 1);
}

#[tokio::test]
async fn cancelling_twice_is_an_invalid_transition() {
    let mut current = scheduled(2, 0);
    current.slot = current.slot.cancel().expect("first cancel");
    let slot_id = current.slot.id();
    let mut slots = MockSlotRepository::new();
    slots
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(current)));
    slots.expect_mark_cancelled().times(0);

    let error = make_service(
        MockScheduleRepository::new(),
        slots,
        6,
        SchedulingPolicy::default(),
    )
    .cancel_slot(SlotActionRequest {
        actor: actor(),
        slot_id,
    })
    .await
    .expect_err("already cancelled");
    assert_eq!(error.code(), ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn deleting_an_unknown_slot_is_not_found() {
    let mut slots = MockSlotRepository::new();
    slots.expect_delete().times(1).return_once(|_| Ok(false));

    let error = make_service(
        MockScheduleRepository::new(),
        slots,
        6,
        SchedulingPolicy::default(),
    )
    .delete_slot(SlotActionRequest {
        actor: actor(),
        slot_id: SlotId::random(),
    })
    .await
    .expect_err("nothing to delete");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case::before_start_with_a_free_seat(6, 1, SlotStatus::Open)]
#[case::before_start_and_full(6, 2, SlotStatus::Full)]
#[case::during_the_shift(9, 2, SlotStatus::InProgress)]
#[case::after_the_shift(11, 0, SlotStatus::Completed)]
#[tokio::test]
async fn listed_slots_carry_status_derived_at_call_time(
    #[case] hour: u32,
    #[case] occupancy: u32,
    #[case] expected: SlotStatus,
) {
    let listed = scheduled(2, occupancy);
    let mut slots = MockSlotRepository::new();
    slots
        .expect_list_between()
        .times(1)
        .return_once(move |_, _| Ok(vec![listed]));

    let views = make_service(
        MockScheduleRepository::new(),
        slots,
        hour,
        SchedulingPolicy::default(),
    )
    .get_slots_by_date_range(day(2025, 3, 1), day(2025, 3, 31))
    .await
    .expect("slots listed");
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].status, expected);
}

#[tokio::test]
async fn local_offset_shifts_the_status_clock() {
    // 06:00 UTC is 08:30 at +02:30, inside the 08:00-10:00 shift.
    let listed = scheduled(2, 0);
    let slot_id = listed.slot.id();
    let mut slots = MockSlotRepository::new();
    slots
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(listed)));
    let policy = SchedulingPolicy {
        utc_offset: chrono::FixedOffset::east_opt(150 * 60).expect("valid offset"),
        ..SchedulingPolicy::default()
    };

    let view = make_service(MockScheduleRepository::new(), slots, 6, policy)
        .get_slot(&slot_id)
        .await
        .expect("slot found");
    assert_eq!(view.status, SlotStatus::InProgress);
}

#[tokio::test]
async fn an_inverted_listing_range_skips_the_store() {
    let mut slots = MockSlotRepository::new();
    slots.expect_list_between().times(0);

    let views = make_service(
        MockScheduleRepository::new(),
        slots,
        6,
        SchedulingPolicy::default(),
    )
    .get_slots_by_date_range(day(2025, 3, 31), day(2025, 3, 1))
    .await
    .expect("empty listing");
    assert!(views.is_empty());
}
