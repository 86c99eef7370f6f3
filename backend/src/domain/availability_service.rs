//! Availability management service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AddExceptionRequest, AvailabilityCommand, AvailabilityQuery, AvailabilityRepository,
    MemberDirectory, RemoveExceptionRequest, SetWeeklyAvailabilityRequest,
};
use crate::domain::service_support::{
    map_availability_repository_error, map_availability_validation_error,
    map_member_directory_error,
};
use crate::domain::{
    AvailabilityId, AvailabilityProfile, Error, ExceptionId, MemberAvailability,
    MemberAvailabilityDraft, MemberId, ScheduleException, ScheduleExceptionDraft,
};

/// Availability service implementing [`AvailabilityCommand`] and
/// [`AvailabilityQuery`].
#[derive(Clone)]
pub struct AvailabilityService<V, M> {
    availability: Arc<V>,
    members: Arc<M>,
}

impl<V, M> AvailabilityService<V, M> {
    /// Create an availability service over the given repository and member directory.
    pub fn new(availability: Arc<V>, members: Arc<M>) -> Self {
        Self {
            availability,
            members,
        }
    }
}

impl<V, M> AvailabilityService<V, M>
where
    V: AvailabilityRepository,
    M: MemberDirectory,
{
    async fn require_member(&self, member_id: &MemberId) -> Result<(), Error> {
        self.members
            .find_by_id(member_id)
            .await
            .map_err(map_member_directory_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("member {member_id} not found")))
    }
}

#[async_trait]
impl<V, M> AvailabilityCommand for AvailabilityService<V, M>
where
    V: AvailabilityRepository,
    M: MemberDirectory,
{
    async fn set_weekly_availability(
        &self,
        request: SetWeeklyAvailabilityRequest,
    ) -> Result<Vec<MemberAvailability>, Error> {
        self.require_member(&request.member_id).await?;

        let rules = request
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| {
                MemberAvailability::new(MemberAvailabilityDraft {
                    id: AvailabilityId::random(),
                    member_id: request.member_id,
                    day_of_week: rule.day_of_week,
                    start_time: rule.start_time,
                    end_time: rule.end_time,
                    is_available: rule.is_available,
                    valid_from: rule.valid_from,
                    valid_until: rule.valid_until,
                    notes: rule.notes,
                })
                .map_err(|err| {
                    map_availability_validation_error(err)
                        .with_details(serde_json::json!({ "ruleIndex": index }))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.availability
            .replace_rules(&request.member_id, &rules)
            .await
            .map_err(map_availability_repository_error)?;
        info!(
            member_id = %request.member_id,
            rules = rules.len(),
            actor = %request.actor,
            "weekly availability replaced"
        );
        Ok(rules)
    }

    async fn add_exception(&self, request: AddExceptionRequest) -> Result<ScheduleException, Error> {
        self.require_member(&request.member_id).await?;
        let exception = ScheduleException::new(ScheduleExceptionDraft {
            id: ExceptionId::random(),
            member_id: request.member_id,
            date: request.date,
            kind: request.kind,
            start_time: request.start_time,
            end_time: request.end_time,
            reason: request.reason,
        })
        .map_err(map_availability_validation_error)?;

        self.availability
            .insert_exception(&exception)
            .await
            .map_err(map_availability_repository_error)?;
        info!(
            exception_id = %exception.id(),
            member_id = %request.member_id,
            date = %request.date,
            actor = %request.actor,
            "availability exception added"
        );
        Ok(exception)
    }

    async fn remove_exception(&self, request: RemoveExceptionRequest) -> Result<(), Error> {
        let deleted = self
            .availability
            .delete_exception(&request.exception_id)
            .await
            .map_err(map_availability_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!(
                "exception {} not found",
                request.exception_id
            )));
        }
        info!(
            exception_id = %request.exception_id,
            actor = %request.actor,
            "availability exception removed"
        );
        Ok(())
    }
}

#[async_trait]
impl<V, M> AvailabilityQuery for AvailabilityService<V, M>
where
    V: AvailabilityRepository,
    M: MemberDirectory,
{
    async fn get_member_availability(
        &self,
        member_id: &MemberId,
    ) -> Result<AvailabilityProfile, Error> {
        let rules = self
            .availability
            .rules_for_member(member_id)
            .await
            .map_err(map_availability_repository_error)?;
        let exceptions = self
            .availability
            .exceptions_for_member(member_id)
            .await
            .map_err(map_availability_repository_error)?;
        Ok(AvailabilityProfile { rules, exceptions })
    }
}

#[cfg(test)]
#[path = "availability_service_tests.rs"]
mod tests;
