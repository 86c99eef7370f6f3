//! Scheduling domain: entities, pure rules, ports, and services.
//!
//! Purpose: Model schedules, dated slots, member availability, and the
//! assignment lifecycle as validated, immutable values. The pure rules (slot
//! expansion, status derivation, availability resolution, candidate ranking,
//! participation statistics) live beside their entities; services in this
//! module orchestrate them over the driven ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure with a stable category.
//! - Schedule, Slot, Assignment, MemberAvailability, ScheduleException: the
//!   aggregates, each built from a `*Draft` through a validating constructor.
//! - ScheduleService, SlotService, CandidateService, AssignmentService,
//!   AvailabilityService: implementations of the driving ports.

pub(crate) mod calendar;
pub(crate) mod enum_macros;
pub mod error;
mod ids;
mod matching;
mod member;
mod policy;
pub mod ports;

mod assignments;
mod availability;
mod schedules;
mod slots;

mod assignment_service;
mod availability_service;
mod candidate_service;
mod schedule_service;
mod service_support;
mod slot_service;

#[cfg(test)]
mod service_fixtures;

pub use self::assignments::{
    Assignment, AssignmentAction, AssignmentDraft, AssignmentParts, AssignmentRole,
    AssignmentStatus, AssignmentTransitionError, AssignmentWithMember, AssignmentWithSlot,
    AttendanceOutcome, MemberAssignmentFilter, ParticipationStats,
};
pub use self::availability::{
    AvailabilityProfile, AvailabilityValidationError, AvailabilityVerdict, ExceptionKind,
    MemberAvailability, MemberAvailabilityDraft, ScheduleException, ScheduleExceptionDraft,
    coverage_score, resolve_availability,
};
pub use self::calendar::{
    CalendarValidationError, DaySet, TimeWindow, TimeWindowDraft, dates_matching,
    weekday_from_index, weekday_index,
};
pub use self::enum_macros::ParseEnumError;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{
    ActorId, AssignmentId, AvailabilityId, ExceptionId, MemberId, ScheduleId, SlotId,
};
pub use self::matching::{Candidate, rank_candidates};
pub use self::member::{Member, MemberValidationError};
pub use self::policy::{CapacityPolicy, SchedulingPolicy};
pub use self::schedules::{
    RecurringPattern, Schedule, ScheduleCategory, ScheduleDraft, ScheduleKind, ScheduleStatus,
    ScheduleSummary, ScheduleValidationError,
};
pub use self::slots::{
    MAX_SEATS, ScheduledSlot, Slot, SlotBatch, SlotStatus, SlotTemplate, SlotTemplateDraft,
    SlotValidationError, SlotView,
};

pub use self::assignment_service::AssignmentService;
pub use self::availability_service::AvailabilityService;
pub use self::candidate_service::CandidateService;
pub use self::schedule_service::ScheduleService;
pub use self::slot_service::SlotService;
