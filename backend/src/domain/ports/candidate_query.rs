//! Driving port for candidate suggestions.

use async_trait::async_trait;

use crate::domain::{Candidate, Error, SlotId};

/// Driving port for ranking members against a slot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateQuery: Send + Sync {
    /// Rank members who declared availability for the slot and are not
    /// already assigned to it. Members without availability data are never
    /// suggested.
    async fn suggest_candidates(&self, slot_id: &SlotId) -> Result<Vec<Candidate>, Error>;
}
