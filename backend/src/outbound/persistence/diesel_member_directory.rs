//! PostgreSQL-backed `MemberDirectory` reading the mirrored `members` table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{MemberDirectory, MemberDirectoryError};
use crate::domain::{Member, MemberId};

use super::diesel_error_mapping;
use super::models::{MemberRow, NewMemberRow};
use super::pool::{DbPool, PoolError};
use super::schema::members;

/// Diesel-backed implementation of the member directory port.
#[derive(Clone)]
pub struct DieselMemberDirectory {
    pool: DbPool,
}

impl DieselMemberDirectory {
    /// Build the member directory adapter over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert or rename a mirrored member.
    pub async fn upsert(&self, member: &Member) -> Result<(), MemberDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(members::table)
            .values(&NewMemberRow {
                id: *member.id().as_uuid(),
                full_name: member.full_name(),
            })
            .on_conflict(members::id)
            .do_update()
            .set(members::full_name.eq(member.full_name()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

fn map_pool_error(error: PoolError) -> MemberDirectoryError {
    diesel_error_mapping::map_pool_error(error, MemberDirectoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MemberDirectoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        MemberDirectoryError::query,
        MemberDirectoryError::connection,
    )
}

fn row_to_member(row: MemberRow) -> Result<Member, MemberDirectoryError> {
    Member::try_from(row).map_err(|err| MemberDirectoryError::query(err.to_string()))
}

#[async_trait]
impl MemberDirectory for DieselMemberDirectory {
    async fn find_by_id(&self, member_id: &MemberId) -> Result<Option<Member>, MemberDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = members::table
            .filter(members::id.eq(member_id.as_uuid()))
            .select(MemberRow::as_select())
            .first::<MemberRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_member).transpose()
    }

    async fn find_many(&self, member_ids: &[MemberId]) -> Result<Vec<Member>, MemberDirectoryError> {
        if member_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = member_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MemberRow> = members::table
            .filter(members::id.eq_any(&ids))
            .order(members::full_name.asc())
            .select(MemberRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_member).collect()
    }
}
