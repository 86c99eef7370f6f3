//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are what callers use; driven ports
//! (`*Repository`, [`MemberDirectory`]) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod assignment_command;
mod assignment_query;
mod assignment_repository;
mod availability_command;
mod availability_query;
mod availability_repository;
mod candidate_query;
mod member_directory;
mod schedule_command;
mod schedule_query;
mod schedule_repository;
mod slot_command;
mod slot_query;
mod slot_repository;

#[cfg(test)]
pub use assignment_command::MockAssignmentCommand;
pub use assignment_command::{
    AssignMemberRequest, AssignMemberResponse, AssignmentActionRequest, AssignmentChange,
    AssignmentCommand, DeclineAssignmentRequest, RecordAttendanceRequest,
    RemoveAssignmentResponse,
};
#[cfg(test)]
pub use assignment_query::MockAssignmentQuery;
pub use assignment_query::AssignmentQuery;
#[cfg(test)]
pub use assignment_repository::MockAssignmentRepository;
pub use assignment_repository::{AssignmentRepository, AssignmentRepositoryError, CapacityGuard};
#[cfg(test)]
pub use availability_command::MockAvailabilityCommand;
pub use availability_command::{
    AddExceptionRequest, AvailabilityCommand, RemoveExceptionRequest,
    SetWeeklyAvailabilityRequest, WeeklyRulePayload,
};
#[cfg(test)]
pub use availability_query::MockAvailabilityQuery;
pub use availability_query::AvailabilityQuery;
#[cfg(test)]
pub use availability_repository::MockAvailabilityRepository;
pub use availability_repository::{AvailabilityRepository, AvailabilityRepositoryError};
#[cfg(test)]
pub use candidate_query::MockCandidateQuery;
pub use candidate_query::CandidateQuery;
#[cfg(test)]
pub use member_directory::MockMemberDirectory;
pub use member_directory::{MemberDirectory, MemberDirectoryError};
#[cfg(test)]
pub use schedule_command::MockScheduleCommand;
pub use schedule_command::{
    CreateScheduleRequest, DeleteScheduleRequest, ScheduleCommand, UpdateScheduleStatusRequest,
};
#[cfg(test)]
pub use schedule_query::MockScheduleQuery;
pub use schedule_query::ScheduleQuery;
#[cfg(test)]
pub use schedule_repository::MockScheduleRepository;
pub use schedule_repository::{ScheduleRepository, ScheduleRepositoryError};
#[cfg(test)]
pub use slot_command::MockSlotCommand;
pub use slot_command::{CreateSlotRequest, GenerateSlotsRequest, SlotActionRequest, SlotCommand};
#[cfg(test)]
pub use slot_query::MockSlotQuery;
pub use slot_query::SlotQuery;
#[cfg(test)]
pub use slot_repository::MockSlotRepository;
pub use slot_repository::{SlotRepository, SlotRepositoryError};
