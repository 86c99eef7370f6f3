//! PostgreSQL-backed `AssignmentRepository`.
//!
//! `insert` locks the slot row with `SELECT ... FOR UPDATE` so the cancelled
//! flag, the duplicate check, and the capacity check see every concurrent
//! write to the same slot. The
//! partial unique index on `(slot_id, member_id)` backs the duplicate rule
//! at the schema level.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{AssignmentRepository, AssignmentRepositoryError, CapacityGuard};
use crate::domain::{Assignment, AssignmentId, AssignmentStatus, MemberId, SlotId};

use super::diesel_error_mapping::{self, is_unique_violation};
use super::diesel_slot_repository::occupancy_by_slot;
use super::models::{AssignmentRow, AssignmentTransitionRow, NewAssignmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{assignments, slots};

/// Partial unique index over non-declined assignments.
const ACTIVE_MEMBER_INDEX: &str = "assignments_active_member_key";

/// Diesel-backed implementation of the assignment repository port.
#[derive(Clone)]
pub struct DieselAssignmentRepository {
    pool: DbPool,
}

impl DieselAssignmentRepository {
    /// Build the assignment adapter over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Result of the locked insert transaction.
enum InsertOutcome {
    Inserted { occupancy: u32 },
    SlotMissing,
    SlotCancelled,
    Duplicate,
    Full { occupancy: u32 },
}

fn map_pool_error(error: PoolError) -> AssignmentRepositoryError {
    diesel_error_mapping::map_pool_error(error, AssignmentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AssignmentRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        AssignmentRepositoryError::query,
        AssignmentRepositoryError::connection,
    )
}

fn row_to_assignment(row: AssignmentRow) -> Result<Assignment, AssignmentRepositoryError> {
    Assignment::try_from(row).map_err(|err| AssignmentRepositoryError::query(err.to_string()))
}

fn outcome_to_result(
    outcome: InsertOutcome,
    assignment: &Assignment,
    guard: CapacityGuard,
) -> Result<u32, AssignmentRepositoryError> {
    match outcome {
        InsertOutcome::Inserted { occupancy } => Ok(occupancy),
        InsertOutcome::SlotMissing => Err(AssignmentRepositoryError::slot_not_found(
            assignment.slot_id().to_string(),
        )),
        InsertOutcome::SlotCancelled => Err(AssignmentRepositoryError::slot_cancelled(
            assignment.slot_id().to_string(),
        )),
        InsertOutcome::Duplicate => Err(AssignmentRepositoryError::duplicate(
            assignment.slot_id().to_string(),
            assignment.member_id().to_string(),
        )),
        InsertOutcome::Full { occupancy } => Err(AssignmentRepositoryError::capacity_exceeded(
            occupancy,
            guard.max_participants,
        )),
    }
}

#[async_trait]
impl AssignmentRepository for DieselAssignmentRepository {
    async fn insert(
        &self,
        assignment: &Assignment,
        guard: CapacityGuard,
    ) -> Result<u32, AssignmentRepositoryError> {
        let row = NewAssignmentRow::from(assignment);
        let slot_id = *assignment.slot_id().as_uuid();
        let member_id = *assignment.member_id().as_uuid();
        let holds_seat = assignment.status().counts_toward_capacity();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let locked = slots::table
                        .filter(slots::id.eq(slot_id))
                        .select(slots::is_cancelled)
                        .for_update()
                        .first::<bool>(conn)
                        .await
                        .optional()?;
                    match locked {
                        None => return Ok(InsertOutcome::SlotMissing),
                        Some(true) => return Ok(InsertOutcome::SlotCancelled),
                        Some(false) => {}
                    }

                    let active: i64 = assignments::table
                        .filter(assignments::slot_id.eq(slot_id))
                        .filter(assignments::member_id.eq(member_id))
                        .filter(assignments::status.ne(AssignmentStatus::Declined.as_str()))
                        .count()
                        .get_result(conn)
                        .await?;
                    if active > 0 {
                        return Ok(InsertOutcome::Duplicate);
                    }

                    let occupancy = occupancy_by_slot(conn, &[slot_id])
                        .await?
                        .get(&slot_id)
                        .copied()
                        .unwrap_or(0);
                    if guard.enforce && holds_seat && occupancy >= guard.max_participants {
                        return Ok(InsertOutcome::Full { occupancy });
                    }

                    diesel::insert_into(assignments::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    let occupancy = if holds_seat { occupancy + 1 } else { occupancy };
                    Ok::<_, diesel::result::Error>(InsertOutcome::Inserted { occupancy })
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| {
                if is_unique_violation(&err, ACTIVE_MEMBER_INDEX) {
                    AssignmentRepositoryError::duplicate(
                        assignment.slot_id().to_string(),
                        assignment.member_id().to_string(),
                    )
                } else {
                    map_diesel_error(err)
                }
            })?;

        outcome_to_result(outcome, assignment, guard)
    }

    async fn find_by_id(
        &self,
        assignment_id: &AssignmentId,
    ) -> Result<Option<Assignment>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = assignments::table
            .filter(assignments::id.eq(assignment_id.as_uuid()))
            .select(AssignmentRow::as_select())
            .first::<AssignmentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_assignment).transpose()
    }

    async fn update(
        &self,
        assignment: &Assignment,
        expected: AssignmentStatus,
    ) -> Result<bool, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            assignments::table.filter(
                assignments::id
                    .eq(assignment.id().as_uuid())
                    .and(assignments::status.eq(expected.as_str())),
            ),
        )
        .set((
            AssignmentTransitionRow::from(assignment),
            assignments::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated == 1)
    }

    async fn delete(
        &self,
        assignment_id: &AssignmentId,
    ) -> Result<bool, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted =
            diesel::delete(assignments::table.filter(assignments::id.eq(assignment_id.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn list_for_slot(
        &self,
        slot_id: &SlotId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AssignmentRow> = assignments::table
            .filter(assignments::slot_id.eq(slot_id.as_uuid()))
            .order((assignments::created_at.asc(), assignments::id.asc()))
            .select(AssignmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_assignment).collect()
    }

    async fn list_for_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AssignmentRow> = assignments::table
            .filter(assignments::member_id.eq(member_id.as_uuid()))
            .order((assignments::created_at.asc(), assignments::id.asc()))
            .select(AssignmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_assignment).collect()
    }
}
