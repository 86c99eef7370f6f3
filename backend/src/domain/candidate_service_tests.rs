//! Tests for candidate suggestion.

use std::sync::Arc;

use chrono::Weekday;

use super::*;
use crate::domain::ports::{
    AvailabilityRepositoryError, MockAssignmentRepository, MockAvailabilityRepository,
    MockMemberDirectory, MockSlotRepository,
};
use crate::domain::service_fixtures::{assignment, member, scheduled, time};
use crate::domain::{
    AssignmentStatus, AvailabilityId, ErrorCode, Member, MemberAvailability,
    MemberAvailabilityDraft, ScheduledSlot,
};

type Service = CandidateService<
    MockSlotRepository,
    MockAssignmentRepository,
    MockAvailabilityRepository,
    MockMemberDirectory,
>;

fn monday_rule(member: &Member, start: u32, end: u32) -> MemberAvailability {
    MemberAvailability::new(MemberAvailabilityDraft {
        id: AvailabilityId::random(),
        member_id: member.id(),
        day_of_week: 1,
        start_time: time(start, 0),
        end_time: time(end, 0),
        is_available: true,
        valid_from: None,
        valid_until: None,
        notes: None,
    })
    .expect("valid rule")
}

fn slots_returning(found: Option<ScheduledSlot>) -> MockSlotRepository {
    let mut slots = MockSlotRepository::new();
    slots
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(found));
    slots
}

fn make_service(
    slots: MockSlotRepository,
    assignments: MockAssignmentRepository,
    availability: MockAvailabilityRepository,
    members: MockMemberDirectory,
) -> Service {
    CandidateService::new(
        Arc::new(slots),
        Arc::new(assignments),
        Arc::new(availability),
        Arc::new(members),
    )
}

#[tokio::test]
async fn ranks_declared_members_who_hold_no_active_assignment() {
    let target = scheduled(3, 1);
    let slot_id = target.slot.id();
    let ana = member("Ana");
    let bruno = member("Bruno");
    let carla = member("Carla");
    let dan = member("Dan");

    let mut assignments = MockAssignmentRepository::new();
    let held = vec![
        assignment(slot_id, carla.id(), AssignmentStatus::Pending),
        assignment(slot_id, dan.id(), AssignmentStatus::Declined),
    ];
    assignments
        .expect_list_for_slot()
        .times(1)
        .return_once(move |_| Ok(held));

    let rules = vec![
        monday_rule(&ana, 8, 10),
        monday_rule(&bruno, 9, 12),
        monday_rule(&carla, 8, 10),
        monday_rule(&dan, 7, 11),
    ];
    let mut availability = MockAvailabilityRepository::new();
    availability
        .expect_rules_for_weekday()
        .withf(|weekday| *weekday == Weekday::Mon)
        .times(1)
        .return_once(move |_| Ok(rules));
    availability
        .expect_exceptions_on()
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let known = vec![ana.clone(), bruno.clone(), dan.clone()];
    let carla_id = carla.id();
    let mut members = MockMemberDirectory::new();
    members
        .expect_find_many()
        .withf(move |ids| ids.len() == 3 && !ids.contains(&carla_id))
        .times(1)
        .return_once(move |_| Ok(known));

    let ranked = make_service(slots_returning(Some(target)), assignments, availability, members)
        .suggest_candidates(&slot_id)
        .await
        .expect("candidates ranked");

    let order: Vec<(&str, u8)> = ranked
        .iter()
        .map(|candidate| (candidate.member_name.as_str(), candidate.score))
        .collect();
    assert_eq!(order, vec![("Ana", 100), ("Dan", 100), ("Bruno", 50)]);
}

#[tokio::test]
async fn nobody_declared_means_no_suggestions() {
    let target = scheduled(3, 0);
    let slot_id = target.slot.id();
    let mut assignments = MockAssignmentRepository::new();
    assignments
        .expect_list_for_slot()
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let mut availability = MockAvailabilityRepository::new();
    availability
        .expect_rules_for_weekday()
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    availability
        .expect_exceptions_on()
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let mut members = MockMemberDirectory::new();
    members.expect_find_many().times(0);

    let ranked = make_service(slots_returning(Some(target)), assignments, availability, members)
        .suggest_candidates(&slot_id)
        .await
        .expect("empty suggestions");
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn unknown_slot_is_not_found() {
    let error = make_service(
        slots_returning(None),
        MockAssignmentRepository::new(),
        MockAvailabilityRepository::new(),
        MockMemberDirectory::new(),
    )
    .suggest_candidates(&SlotId::random())
    .await
    .expect_err("slot missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn availability_outage_is_reported_as_unavailable() {
    let target = scheduled(3, 0);
    let slot_id = target.slot.id();
    let mut assignments = MockAssignmentRepository::new();
    assignments
        .expect_list_for_slot()
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let mut availability = MockAvailabilityRepository::new();
    availability
        .expect_rules_for_weekday()
        .times(1)
        .return_once(|_| Err(AvailabilityRepositoryError::connection("timeout")));

    let error = make_service(
        slots_returning(Some(target)),
        assignments,
        availability,
        MockMemberDirectory::new(),
    )
    .suggest_candidates(&slot_id)
    .await
    .expect_err("store down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
