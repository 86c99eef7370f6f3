//! PostgreSQL-backed `SlotRepository`.
//!
//! Slot reads join the owning schedule and count seat-holding assignments in
//! a second grouped query, so status can be derived without storing it.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{SlotRepository, SlotRepositoryError};
use crate::domain::{ScheduleSummary, ScheduledSlot, Slot, SlotId};

use super::diesel_error_mapping::{self, is_foreign_key_violation};
use super::models::{NewSlotRow, ScheduleSummaryRow, SlotRow};
use super::pool::{DbPool, PoolError};
use super::schema::{assignments, schedules, slots};
use super::seat_holding_statuses;

/// Rows per insert statement; keeps the bind count under PostgreSQL's limit.
const INSERT_CHUNK: usize = 1_000;

/// Diesel-backed implementation of the slot repository port.
#[derive(Clone)]
pub struct DieselSlotRepository {
    pool: DbPool,
}

impl DieselSlotRepository {
    /// Build the slot adapter over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SlotRepositoryError {
    diesel_error_mapping::map_pool_error(error, SlotRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SlotRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        SlotRepositoryError::query,
        SlotRepositoryError::connection,
    )
}

/// Seat-holding assignment counts keyed by slot id.
pub(super) async fn occupancy_by_slot(
    conn: &mut AsyncPgConnection,
    slot_ids: &[Uuid],
) -> Result<HashMap<Uuid, u32>, diesel::result::Error> {
    if slot_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let counts: Vec<(Uuid, i64)> = assignments::table
        .filter(assignments::slot_id.eq_any(slot_ids))
        .filter(assignments::status.eq_any(seat_holding_statuses()))
        .group_by(assignments::slot_id)
        .select((assignments::slot_id, diesel::dsl::count_star()))
        .load(conn)
        .await?;

    Ok(counts
        .into_iter()
        .map(|(slot_id, count)| (slot_id, u32::try_from(count).unwrap_or(u32::MAX)))
        .collect())
}

fn assemble(
    rows: Vec<(SlotRow, ScheduleSummaryRow)>,
    occupancy: &HashMap<Uuid, u32>,
) -> Result<Vec<ScheduledSlot>, SlotRepositoryError> {
    rows.into_iter()
        .map(|(slot_row, schedule_row)| {
            let seats = occupancy.get(&slot_row.id).copied().unwrap_or(0);
            let slot = Slot::try_from(slot_row)
                .map_err(|err| SlotRepositoryError::query(err.to_string()))?;
            let schedule = ScheduleSummary::try_from(schedule_row)
                .map_err(|err| SlotRepositoryError::query(err.to_string()))?;
            Ok(ScheduledSlot {
                slot,
                schedule,
                occupancy: seats,
            })
        })
        .collect()
}

#[async_trait]
impl SlotRepository for DieselSlotRepository {
    async fn insert_many(&self, batch: &[Slot]) -> Result<(), SlotRepositoryError> {
        let Some(first) = batch.first() else {
            return Ok(());
        };
        let schedule_id = first.schedule_id();
        let rows: Vec<NewSlotRow<'_>> = batch.iter().map(NewSlotRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                for chunk in rows.chunks(INSERT_CHUNK) {
                    diesel::insert_into(slots::table)
                        .values(chunk)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                SlotRepositoryError::missing_schedule(schedule_id.to_string())
            } else {
                map_diesel_error(err)
            }
        })
    }

    async fn find_by_id(
        &self,
        slot_id: &SlotId,
    ) -> Result<Option<ScheduledSlot>, SlotRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = slots::table
            .inner_join(schedules::table)
            .filter(slots::id.eq(slot_id.as_uuid()))
            .select((SlotRow::as_select(), ScheduleSummaryRow::as_select()))
            .first::<(SlotRow, ScheduleSummaryRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let occupancy = occupancy_by_slot(&mut conn, &[row.0.id])
            .await
            .map_err(map_diesel_error)?;
        Ok(assemble(vec![row], &occupancy)?.pop())
    }

    async fn list_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduledSlot>, SlotRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(SlotRow, ScheduleSummaryRow)> = slots::table
            .inner_join(schedules::table)
            .filter(slots::date.between(start, end))
            .order((slots::date.asc(), slots::start_time.asc(), slots::name.asc()))
            .select((SlotRow::as_select(), ScheduleSummaryRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|(slot, _)| slot.id).collect();
        let occupancy = occupancy_by_slot(&mut conn, &ids)
            .await
            .map_err(map_diesel_error)?;
        assemble(rows, &occupancy)
    }

    async fn delete(&self, slot_id: &SlotId) -> Result<bool, SlotRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(slots::table.filter(slots::id.eq(slot_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn mark_cancelled(&self, slot_id: &SlotId) -> Result<bool, SlotRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            slots::table.filter(
                slots::id
                    .eq(slot_id.as_uuid())
                    .and(slots::is_cancelled.eq(false)),
            ),
        )
        .set(slots::is_cancelled.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated == 1)
    }
}
