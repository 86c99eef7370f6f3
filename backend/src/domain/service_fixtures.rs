//! Fixtures shared by the service unit tests.

use std::sync::Arc;

use chrono::NaiveTime;
use mockable::Clock;

use crate::domain::{
    ActorId, Assignment, AssignmentId, AssignmentParts, AssignmentRole, AssignmentStatus, Member,
    MemberId, Schedule, ScheduleCategory, ScheduleDraft, ScheduleId, ScheduleKind,
    ScheduleStatus, ScheduledSlot, Slot, SlotId, SlotTemplate, SlotTemplateDraft,
};
use crate::test_support::{MutableClock, day, utc_at};

pub(crate) fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

/// Clock fixed at `hour:00` UTC on 2025-03-03, a Monday.
pub(crate) fn clock_at(hour: u32) -> Arc<dyn Clock> {
    Arc::new(MutableClock::at(day(2025, 3, 3), hour, 0))
}

pub(crate) fn actor() -> ActorId {
    ActorId::random()
}

pub(crate) fn schedule(status: ScheduleStatus) -> Schedule {
    Schedule::with_status(
        ScheduleDraft {
            id: ScheduleId::random(),
            name: "Morning watch".to_owned(),
            description: None,
            kind: ScheduleKind::Weekly,
            category: ScheduleCategory::Vigilance,
            start_date: day(2025, 3, 1),
            end_date: Some(day(2025, 3, 31)),
            is_recurring: true,
            recurring_pattern: None,
            territory_scope: None,
            color: Some("#336699".to_owned()),
            created_by: None,
            created_at: utc_at(day(2025, 2, 20), 9, 0),
        },
        status,
    )
    .expect("valid schedule")
}

/// 08:00-10:00 slot on 2025-03-03 with `max` seats.
pub(crate) fn slot(schedule_id: ScheduleId, max: u32) -> Slot {
    SlotTemplate::new(SlotTemplateDraft {
        name: "Gate".to_owned(),
        start_time: time(8, 0),
        end_time: time(10, 0),
        location: Some("North gate".to_owned()),
        location_details: None,
        max_participants: max,
        min_participants: 0,
        notes: None,
    })
    .expect("valid template")
    .instantiate(SlotId::random(), schedule_id, day(2025, 3, 3))
}

pub(crate) fn scheduled(max: u32, occupancy: u32) -> ScheduledSlot {
    let owner = schedule(ScheduleStatus::Active);
    ScheduledSlot {
        slot: slot(owner.id(), max),
        schedule: owner.summary(),
        occupancy,
    }
}

pub(crate) fn member(name: &str) -> Member {
    Member::new(MemberId::random(), name).expect("valid member")
}

/// An assignment already in `status`, created before the fixture clock.
pub(crate) fn assignment(
    slot_id: SlotId,
    member_id: MemberId,
    status: AssignmentStatus,
) -> Assignment {
    Assignment::from_parts(AssignmentParts {
        id: AssignmentId::random(),
        slot_id,
        member_id,
        assigned_by: None,
        role: AssignmentRole::Participant,
        status,
        confirmed_at: None,
        decline_reason: None,
        check_in_at: None,
        check_out_at: None,
        notes: None,
        created_at: utc_at(day(2025, 3, 1), 12, 0),
    })
}
