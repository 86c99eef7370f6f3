//! Integration tests for the Diesel scheduling adapters against embedded
//! PostgreSQL.
//!
//! Every test provisions its own migrated database and drives the adapters
//! through their port traits on a shared Tokio runtime.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use scheduling::domain::ports::{
    AssignmentRepository, AssignmentRepositoryError, AvailabilityRepository, CapacityGuard,
    MemberDirectory, ScheduleRepository, ScheduleRepositoryError, SlotRepository,
    SlotRepositoryError,
};
use scheduling::domain::{
    ActorId, Assignment, AssignmentDraft, AssignmentId, AssignmentRole, AssignmentStatus,
    AvailabilityId, ExceptionId, ExceptionKind, Member, MemberAvailability,
    MemberAvailabilityDraft, MemberId, Schedule, ScheduleCategory, ScheduleDraft,
    ScheduleException, ScheduleExceptionDraft, ScheduleId, ScheduleKind, ScheduleStatus, Slot,
    SlotId, SlotTemplate, SlotTemplateDraft,
};
use scheduling::outbound::persistence::{DbPool, DieselStore, PoolConfig};
use scheduling::test_support::{day, utc_at};
use tokio::runtime::Runtime;

mod support;

use support::{handle_cluster_setup_failure, migrated_database, shared_cluster};

struct Harness {
    runtime: Runtime,
    store: DieselStore,
    _database: TemporaryDatabase,
}

fn setup() -> Result<Harness, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = migrated_database(cluster, &runtime)?;
    let config = PoolConfig::new(database.url().to_string())
        .with_max_size(4)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;
    Ok(Harness {
        runtime,
        store: DieselStore::new(pool),
        _database: database,
    })
}

#[fixture]
fn harness() -> Option<Harness> {
    match setup() {
        Ok(harness) => Some(harness),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).expect("valid time")
}

fn created_at() -> DateTime<Utc> {
    utc_at(day(2025, 3, 1), 12, 0)
}

fn schedule() -> Schedule {
    Schedule::new(ScheduleDraft {
        id: ScheduleId::random(),
        name: "Gate watch".to_owned(),
        description: Some("North gate rota".to_owned()),
        kind: ScheduleKind::Weekly,
        category: ScheduleCategory::Vigilance,
        start_date: day(2025, 3, 1),
        end_date: Some(day(2025, 3, 31)),
        is_recurring: false,
        recurring_pattern: None,
        territory_scope: None,
        color: Some("#aa3300".to_owned()),
        created_by: Some(ActorId::random()),
        created_at: created_at(),
    })
    .expect("valid schedule")
}

fn slot_on(schedule_id: ScheduleId, date: NaiveDate, start: u32, max: u32) -> Slot {
    SlotTemplate::new(SlotTemplateDraft {
        name: "Gate".to_owned(),
        start_time: time(start),
        end_time: time(start + 2),
        location: Some("North gate".to_owned()),
        location_details: None,
        max_participants: max,
        min_participants: 0,
        notes: None,
    })
    .expect("valid template")
    .instantiate(SlotId::random(), schedule_id, date)
}

fn pending(slot_id: SlotId, member_id: MemberId) -> Assignment {
    Assignment::new(AssignmentDraft {
        id: AssignmentId::random(),
        slot_id,
        member_id,
        assigned_by: None,
        role: AssignmentRole::Participant,
        notes: None,
        created_at: created_at(),
    })
}

fn guard(max_participants: u32) -> CapacityGuard {
    CapacityGuard {
        max_participants,
        enforce: true,
    }
}

impl Harness {
    async fn seed_members(&self, names: &[&str]) -> Vec<MemberId> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let member = Member::new(MemberId::random(), *name).expect("valid member");
            self.store
                .members
                .upsert(&member)
                .await
                .expect("member stored");
            ids.push(member.id());
        }
        ids
    }

    /// A stored schedule with one Monday slot of `max` seats.
    async fn seed_slot(&self, max: u32) -> (ScheduleId, SlotId) {
        let owner = schedule();
        self.store
            .schedules
            .insert(&owner)
            .await
            .expect("schedule stored");
        let slot = slot_on(owner.id(), day(2025, 3, 3), 8, max);
        let slot_id = slot.id();
        self.store
            .slots
            .insert_many(&[slot])
            .await
            .expect("slot stored");
        (owner.id(), slot_id)
    }
}

#[rstest]
fn schedules_round_trip_and_change_status_once(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    harness.runtime.block_on(async {
        let repo = &harness.store.schedules;
        let stored = schedule();
        repo.insert(&stored).await.expect("schedule stored");

        let again = repo.insert(&stored).await.expect_err("same id twice");
        assert!(matches!(again, ScheduleRepositoryError::AlreadyExists { .. }));

        let found = repo
            .find_by_id(&stored.id())
            .await
            .expect("lookup")
            .expect("schedule exists");
        assert_eq!(found.id(), stored.id());
        assert_eq!(found.name(), "Gate watch");
        assert_eq!(found.status(), ScheduleStatus::Draft);

        assert!(
            repo.update_status(&stored.id(), ScheduleStatus::Draft, ScheduleStatus::Active)
                .await
                .expect("update")
        );
        assert!(
            !repo
                .update_status(&stored.id(), ScheduleStatus::Draft, ScheduleStatus::Active)
                .await
                .expect("update")
        );
        let active = repo
            .list(Some(ScheduleStatus::Active))
            .await
            .expect("listing");
        assert_eq!(active.len(), 1);
        let drafts = repo
            .list(Some(ScheduleStatus::Draft))
            .await
            .expect("listing");
        assert!(drafts.is_empty());
    });
}

#[rstest]
fn slot_batches_are_atomic_and_listed_in_order(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    harness.runtime.block_on(async {
        let (schedule_id, first_id) = harness.seed_slot(2).await;
        let repo = &harness.store.slots;

        let orphaned = [
            slot_on(schedule_id, day(2025, 3, 5), 8, 2),
            slot_on(ScheduleId::random(), day(2025, 3, 6), 8, 2),
        ];
        let error = repo
            .insert_many(&orphaned)
            .await
            .expect_err("unknown schedule");
        assert!(matches!(error, SlotRepositoryError::MissingSchedule { .. }));

        let later = slot_on(schedule_id, day(2025, 3, 3), 14, 2);
        let earlier = slot_on(schedule_id, day(2025, 3, 2), 18, 2);
        let expected = vec![earlier.id(), first_id, later.id()];
        repo.insert_many(&[later, earlier])
            .await
            .expect("batch stored");

        let listed: Vec<SlotId> = repo
            .list_between(day(2025, 3, 1), day(2025, 3, 31))
            .await
            .expect("listing")
            .into_iter()
            .map(|scheduled| scheduled.slot.id())
            .collect();
        assert_eq!(listed, expected);
        assert!(
            repo.list_between(day(2025, 3, 31), day(2025, 3, 1))
                .await
                .expect("listing")
                .is_empty()
        );

        assert!(repo.mark_cancelled(&first_id).await.expect("cancel"));
        assert!(!repo.mark_cancelled(&first_id).await.expect("cancel"));
        let cancelled = repo
            .find_by_id(&first_id)
            .await
            .expect("lookup")
            .expect("slot exists");
        assert!(cancelled.slot.is_cancelled());
        assert_eq!(cancelled.schedule.name, "Gate watch");
    });
}

#[rstest]
fn cancelled_slots_refuse_bookings_under_the_lock(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    harness.runtime.block_on(async {
        let (_, slot_id) = harness.seed_slot(2).await;
        let members = harness.seed_members(&["Ana"]).await;
        let [ana] = members.as_slice() else {
            panic!("one member seeded");
        };
        assert!(
            harness
                .store
                .slots
                .mark_cancelled(&slot_id)
                .await
                .expect("cancel")
        );

        let repo = &harness.store.assignments;
        assert_eq!(
            repo.insert(&pending(slot_id, *ana), guard(2)).await,
            Err(AssignmentRepositoryError::slot_cancelled(slot_id.to_string()))
        );
        assert!(repo.list_for_slot(&slot_id).await.expect("listing").is_empty());
    });
}

#[rstest]
fn bookings_respect_duplicates_and_capacity(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    harness.runtime.block_on(async {
        let (_, slot_id) = harness.seed_slot(2).await;
        let members = harness.seed_members(&["Ana", "Bruno", "Carla"]).await;
        let [ana, bruno, carla] = members.as_slice() else {
            panic!("three members seeded");
        };
        let repo = &harness.store.assignments;

        let ana_booking = pending(slot_id, *ana);
        assert_eq!(repo.insert(&ana_booking, guard(2)).await, Ok(1));
        let duplicate = repo
            .insert(&pending(slot_id, *ana), guard(2))
            .await
            .expect_err("active booking exists");
        assert!(matches!(duplicate, AssignmentRepositoryError::Duplicate { .. }));

        assert_eq!(repo.insert(&pending(slot_id, *bruno), guard(2)).await, Ok(2));
        assert_eq!(
            repo.insert(&pending(slot_id, *carla), guard(2)).await,
            Err(AssignmentRepositoryError::capacity_exceeded(2_u32, 2_u32))
        );

        let declined = ana_booking.decline(Some("away".to_owned())).expect("pending");
        assert!(
            repo.update(&declined, AssignmentStatus::Pending)
                .await
                .expect("update")
        );
        assert!(
            !repo
                .update(&declined, AssignmentStatus::Pending)
                .await
                .expect("update")
        );
        assert_eq!(repo.insert(&pending(slot_id, *ana), guard(2)).await, Ok(2));

        let ana_history = repo.list_for_member(ana).await.expect("listing");
        let mut statuses: Vec<_> = ana_history
            .iter()
            .map(|assignment| assignment.status().as_str())
            .collect();
        statuses.sort_unstable();
        assert_eq!(statuses, vec!["declined", "pending"]);
        let stored = repo
            .find_by_id(&ana_booking.id())
            .await
            .expect("lookup")
            .expect("assignment exists");
        assert_eq!(stored.decline_reason(), Some("away"));

        let occupancy = harness
            .store
            .slots
            .find_by_id(&slot_id)
            .await
            .expect("lookup")
            .expect("slot exists")
            .occupancy;
        assert_eq!(occupancy, 2);
    });
}

#[rstest]
fn concurrent_bookings_stop_at_capacity(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    harness.runtime.block_on(async {
        let (_, slot_id) = harness.seed_slot(3).await;
        let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let members = harness.seed_members(&names).await;

        let attempts: Vec<_> = members
            .into_iter()
            .map(|member_id| {
                let repo = harness.store.assignments.clone();
                tokio::spawn(async move { repo.insert(&pending(slot_id, member_id), guard(3)).await })
            })
            .collect();
        let mut booked = 0;
        for attempt in attempts {
            if attempt.await.expect("task completes").is_ok() {
                booked += 1;
            }
        }
        assert_eq!(booked, 3);
        let listed = harness
            .store
            .assignments
            .list_for_slot(&slot_id)
            .await
            .expect("listing");
        assert_eq!(listed.len(), 3);
    });
}

#[rstest]
fn weekly_rules_are_replaced_and_exceptions_removed(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    harness.runtime.block_on(async {
        let members = harness.seed_members(&["Ana"]).await;
        let ana = members.first().copied().expect("seeded");
        let repo = &harness.store.availability;
        let rule = |day_of_week: u8, start: u32, end: u32| {
            MemberAvailability::new(MemberAvailabilityDraft {
                id: AvailabilityId::random(),
                member_id: ana,
                day_of_week,
                start_time: time(start),
                end_time: time(end),
                is_available: true,
                valid_from: None,
                valid_until: None,
                notes: None,
            })
            .expect("valid rule")
        };

        repo.replace_rules(&ana, &[rule(1, 8, 12), rule(3, 8, 12)])
            .await
            .expect("rules stored");
        repo.replace_rules(&ana, &[rule(2, 18, 21)])
            .await
            .expect("rules replaced");
        assert!(
            repo.rules_for_weekday(Weekday::Mon)
                .await
                .expect("lookup")
                .is_empty()
        );
        let tuesday = repo.rules_for_weekday(Weekday::Tue).await.expect("lookup");
        assert_eq!(tuesday.len(), 1);
        assert_eq!(repo.rules_for_member(&ana).await.expect("lookup"), tuesday);

        let exception = ScheduleException::new(ScheduleExceptionDraft {
            id: ExceptionId::random(),
            member_id: ana,
            date: day(2025, 3, 4),
            kind: ExceptionKind::Unavailable,
            start_time: None,
            end_time: None,
            reason: Some("travelling".to_owned()),
        })
        .expect("valid exception");
        repo.insert_exception(&exception)
            .await
            .expect("exception stored");
        assert_eq!(
            repo.exceptions_on(day(2025, 3, 4)).await.expect("lookup"),
            vec![exception.clone()]
        );
        assert!(repo.delete_exception(&exception.id()).await.expect("delete"));
        assert!(!repo.delete_exception(&exception.id()).await.expect("delete"));
        assert!(
            repo.exceptions_for_member(&ana)
                .await
                .expect("lookup")
                .is_empty()
        );
    });
}

#[rstest]
fn member_lookups_skip_unknown_ids(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    harness.runtime.block_on(async {
        let members = harness.seed_members(&["Bruno", "Ana"]).await;
        let directory = &harness.store.members;

        let renamed = Member::new(members[0], "Bruno Silva").expect("valid member");
        directory.upsert(&renamed).await.expect("member renamed");

        let mut requested = members.clone();
        requested.push(MemberId::random());
        let found = directory.find_many(&requested).await.expect("lookup");
        let names: Vec<_> = found.iter().map(Member::full_name).collect();
        assert_eq!(names, vec!["Ana", "Bruno Silva"]);
        assert!(
            directory
                .find_by_id(&MemberId::random())
                .await
                .expect("lookup")
                .is_none()
        );
        assert!(directory.find_many(&[]).await.expect("lookup").is_empty());
    });
}

#[rstest]
fn deleting_a_schedule_cascades(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    harness.runtime.block_on(async {
        let (schedule_id, slot_id) = harness.seed_slot(2).await;
        let members = harness.seed_members(&["Ana"]).await;
        let ana = members.first().copied().expect("seeded");
        harness
            .store
            .assignments
            .insert(&pending(slot_id, ana), guard(2))
            .await
            .expect("booking");

        assert!(
            harness
                .store
                .schedules
                .delete(&schedule_id)
                .await
                .expect("delete")
        );
        assert!(
            harness
                .store
                .slots
                .find_by_id(&slot_id)
                .await
                .expect("lookup")
                .is_none()
        );
        assert!(
            harness
                .store
                .assignments
                .list_for_member(&ana)
                .await
                .expect("listing")
                .is_empty()
        );
    });
}
