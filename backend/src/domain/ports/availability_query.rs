//! Driving port for reading a member's declared availability.

use async_trait::async_trait;

use crate::domain::{AvailabilityProfile, Error, MemberId};

/// Driving port for reading member availability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityQuery: Send + Sync {
    async fn get_member_availability(
        &self,
        member_id: &MemberId,
    ) -> Result<AvailabilityProfile, Error>;
}
