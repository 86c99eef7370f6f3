//! Port for member availability rules and exceptions.

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};

use crate::domain::{ExceptionId, MemberAvailability, MemberId, ScheduleException};

use super::define_port_error;

define_port_error! {
    /// Errors raised by availability repository adapters.
    pub enum AvailabilityRepositoryError for "availability repository" {}
}

/// Port for storing weekly rules and dated exceptions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Weekly rules for every member on `weekday`.
    async fn rules_for_weekday(
        &self,
        weekday: Weekday,
    ) -> Result<Vec<MemberAvailability>, AvailabilityRepositoryError>;

    /// Exceptions for every member dated `date`.
    async fn exceptions_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleException>, AvailabilityRepositoryError>;

    async fn rules_for_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<MemberAvailability>, AvailabilityRepositoryError>;

    async fn exceptions_for_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<ScheduleException>, AvailabilityRepositoryError>;

    /// Replace a member's weekly rules in one atomic write.
    async fn replace_rules(
        &self,
        member_id: &MemberId,
        rules: &[MemberAvailability],
    ) -> Result<(), AvailabilityRepositoryError>;

    async fn insert_exception(
        &self,
        exception: &ScheduleException,
    ) -> Result<(), AvailabilityRepositoryError>;

    /// Returns `false` when the exception did not exist.
    async fn delete_exception(
        &self,
        exception_id: &ExceptionId,
    ) -> Result<bool, AvailabilityRepositoryError>;
}
