//! Port onto the membership subsystem.

use async_trait::async_trait;

use crate::domain::{Member, MemberId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by member directory adapters.
    pub enum MemberDirectoryError for "member directory" {}
}

/// Read-only lookup of members by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn find_by_id(&self, member_id: &MemberId) -> Result<Option<Member>, MemberDirectoryError>;

    /// Members among `member_ids` that exist; unknown ids are skipped.
    async fn find_many(&self, member_ids: &[MemberId]) -> Result<Vec<Member>, MemberDirectoryError>;
}
