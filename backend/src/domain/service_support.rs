//! Error mapping and clock helpers shared by the scheduling services.

use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    AssignmentRepositoryError, AvailabilityRepositoryError, MemberDirectoryError,
    ScheduleRepositoryError, SlotRepositoryError,
};
use crate::domain::{
    AssignmentTransitionError, AvailabilityValidationError, Error, ScheduleValidationError,
    SchedulingPolicy, SlotValidationError,
};

pub(crate) fn map_schedule_repository_error(error: ScheduleRepositoryError) -> Error {
    match error {
        ScheduleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("schedule repository unavailable: {message}"))
        }
        ScheduleRepositoryError::Query { message } => {
            Error::internal(format!("schedule repository error: {message}"))
        }
        ScheduleRepositoryError::AlreadyExists { schedule_id } => {
            Error::concurrency_conflict(format!("schedule {schedule_id} already exists"))
        }
    }
}

pub(crate) fn map_slot_repository_error(error: SlotRepositoryError) -> Error {
    match error {
        SlotRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("slot repository unavailable: {message}"))
        }
        SlotRepositoryError::Query { message } => {
            Error::internal(format!("slot repository error: {message}"))
        }
        SlotRepositoryError::MissingSchedule { schedule_id } => {
            Error::not_found(format!("schedule {schedule_id} not found"))
        }
    }
}

pub(crate) fn map_assignment_repository_error(error: AssignmentRepositoryError) -> Error {
    match error {
        AssignmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("assignment repository unavailable: {message}"))
        }
        AssignmentRepositoryError::Query { message } => {
            Error::internal(format!("assignment repository error: {message}"))
        }
        AssignmentRepositoryError::Duplicate { slot_id, member_id } => {
            Error::duplicate_assignment(format!(
                "member {member_id} already has an active assignment on slot {slot_id}"
            ))
            .with_details(json!({ "slotId": slot_id, "memberId": member_id }))
        }
        AssignmentRepositoryError::CapacityExceeded {
            occupancy,
            max_participants,
        } => Error::capacity_exceeded(format!(
            "slot is full ({occupancy} of {max_participants} seats taken)"
        ))
        .with_details(json!({ "occupancy": occupancy, "maxParticipants": max_participants })),
        AssignmentRepositoryError::SlotNotFound { slot_id } => {
            Error::not_found(format!("slot {slot_id} not found"))
        }
        AssignmentRepositoryError::SlotCancelled { slot_id } => Error::invalid_transition(
            format!("slot {slot_id} is cancelled and accepts no assignments"),
        ),
    }
}

pub(crate) fn map_availability_repository_error(error: AvailabilityRepositoryError) -> Error {
    match error {
        AvailabilityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("availability repository unavailable: {message}"))
        }
        AvailabilityRepositoryError::Query { message } => {
            Error::internal(format!("availability repository error: {message}"))
        }
    }
}

pub(crate) fn map_member_directory_error(error: MemberDirectoryError) -> Error {
    match error {
        MemberDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("member directory unavailable: {message}"))
        }
        MemberDirectoryError::Query { message } => {
            Error::internal(format!("member directory error: {message}"))
        }
    }
}

pub(crate) fn map_schedule_validation_error(error: ScheduleValidationError) -> Error {
    match error {
        ScheduleValidationError::StatusUnchanged { .. }
        | ScheduleValidationError::IllegalStatusChange { .. } => {
            Error::invalid_transition(error.to_string())
        }
        ScheduleValidationError::EmptyName | ScheduleValidationError::EndBeforeStart { .. } => {
            Error::invalid_request(error.to_string())
        }
    }
}

pub(crate) fn map_slot_validation_error(error: SlotValidationError) -> Error {
    match error {
        SlotValidationError::AlreadyCancelled => Error::invalid_transition(error.to_string()),
        SlotValidationError::EmptyName
        | SlotValidationError::Window(_)
        | SlotValidationError::ZeroCapacity
        | SlotValidationError::CapacityTooLarge { .. }
        | SlotValidationError::MinimumExceedsCapacity { .. } => {
            Error::invalid_request(error.to_string())
        }
    }
}

pub(crate) fn map_transition_error(error: AssignmentTransitionError) -> Error {
    match error {
        AssignmentTransitionError::IllegalTransition { .. } => {
            Error::invalid_transition(error.to_string())
        }
        AssignmentTransitionError::CheckOutBeforeCheckIn => {
            Error::invalid_request(error.to_string())
        }
    }
}

pub(crate) fn map_availability_validation_error(error: AvailabilityValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

/// Local wall-clock time per the configured offset.
pub(crate) fn local_now(clock: &dyn Clock, policy: &SchedulingPolicy) -> chrono::NaiveDateTime {
    policy.local_time(clock.utc())
}
