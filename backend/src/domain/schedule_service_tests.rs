//! Tests for the schedule service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockScheduleRepository, ScheduleRepositoryError};
use crate::domain::service_fixtures::{actor, clock_at, schedule};
use crate::domain::{ScheduleCategory, ScheduleKind};
use crate::test_support::day;

fn make_service(repo: MockScheduleRepository) -> ScheduleService<MockScheduleRepository> {
    ScheduleService::new(Arc::new(repo), clock_at(6))
}

fn create_request(name: &str) -> CreateScheduleRequest {
    CreateScheduleRequest {
        actor: actor(),
        name: name.to_owned(),
        description: None,
        kind: ScheduleKind::Event,
        category: ScheduleCategory::Training,
        start_date: day(2025, 3, 1),
        end_date: Some(day(2025, 3, 2)),
        is_recurring: false,
        recurring_pattern: None,
        territory_scope: None,
        color: None,
    }
}

#[tokio::test]
async fn create_stores_a_draft_stamped_with_the_actor() {
    let mut repo = MockScheduleRepository::new();
    repo.expect_insert()
        .withf(|schedule| schedule.status() == ScheduleStatus::Draft)
        .times(1)
        .return_once(|_| Ok(()));

    let request = create_request("First aid course");
    let actor = request.actor;
    let created = make_service(repo)
        .create_schedule(request)
        .await
        .expect("schedule created");

    assert_eq!(created.name(), "First aid course");
    assert_eq!(created.created_by(), Some(actor));
    assert_eq!(created.status(), ScheduleStatus::Draft);
}

#[tokio::test]
async fn create_rejects_a_blank_name_before_writing() {
    let mut repo = MockScheduleRepository::new();
    repo.expect_insert().times(0);

    let error = make_service(repo)
        .create_schedule(create_request("   "))
        .await
        .expect_err("blank name rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn create_rejects_an_end_date_before_the_start() {
    let mut repo = MockScheduleRepository::new();
    repo.expect_insert().times(0);
    let mut request = create_request("Inverted");
    request.end_date = Some(day(2025, 2, 1));

    let error = make_service(repo)
        .create_schedule(request)
        .await
        .expect_err("inverted dates rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn create_surfaces_an_unreachable_store() {
    let mut repo = MockScheduleRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(ScheduleRepositoryError::connection("refused")));

    let error = make_service(repo)
        .create_schedule(create_request("Patrol"))
        .await
        .expect_err("store down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn activating_a_draft_compares_against_the_stored_status() {
    let existing = schedule(ScheduleStatus::Draft);
    let schedule_id = existing.id();
    let mut repo = MockScheduleRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update_status()
        .withf(move |id, expected, next| {
            *id == schedule_id
                && *expected == ScheduleStatus::Draft
                && *next == ScheduleStatus::Active
        })
        .times(1)
        .return_once(|_, _, _| Ok(true));

    let updated = make_service(repo)
        .update_schedule_status(UpdateScheduleStatusRequest {
            actor: actor(),
            schedule_id,
            status: ScheduleStatus::Active,
        })
        .await
        .expect("status updated");
    assert_eq!(updated.status(), ScheduleStatus::Active);
}

#[tokio::test]
async fn completing_a_draft_is_an_invalid_transition() {
    let existing = schedule(ScheduleStatus::Draft);
    let schedule_id = existing.id();
    let mut repo = MockScheduleRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update_status().times(0);

    let error = make_service(repo)
        .update_schedule_status(UpdateScheduleStatusRequest {
            actor: actor(),
            schedule_id,
            status: ScheduleStatus::Completed,
        })
        .await
        .expect_err("draft cannot complete");
    assert_eq!(error.code(), ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn a_lost_status_race_is_a_concurrency_conflict() {
    let existing = schedule(ScheduleStatus::Active);
    let schedule_id = existing.id();
    let mut repo = MockScheduleRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update_status()
        .times(1)
        .return_once(|_, _, _| Ok(false));

    let error = make_service(repo)
        .update_schedule_status(UpdateScheduleStatusRequest {
            actor: actor(),
            schedule_id,
            status: ScheduleStatus::Cancelled,
        })
        .await
        .expect_err("race lost");
    assert_eq!(error.code(), ErrorCode::ConcurrencyConflict);
}

#[tokio::test]
async fn deleting_an_unknown_schedule_is_not_found() {
    let mut repo = MockScheduleRepository::new();
    repo.expect_delete().times(1).return_once(|_| Ok(false));

    let error = make_service(repo)
        .delete_schedule(DeleteScheduleRequest {
            actor: actor(),
            schedule_id: ScheduleId::random(),
        })
        .await
        .expect_err("nothing to delete");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn get_schedule_reports_missing_rows() {
    let mut repo = MockScheduleRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let error = make_service(repo)
        .get_schedule(&ScheduleId::random())
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn list_passes_the_status_filter_through() {
    let active = schedule(ScheduleStatus::Active);
    let mut repo = MockScheduleRepository::new();
    repo.expect_list()
        .withf(|status| *status == Some(ScheduleStatus::Active))
        .times(1)
        .return_once(move |_| Ok(vec![active]));

    let listed = make_service(repo)
        .list_schedules(Some(ScheduleStatus::Active))
        .await
        .expect("listed");
    assert_eq!(listed.len(), 1);
}
