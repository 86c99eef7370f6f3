//! PostgreSQL-backed `AvailabilityRepository`.

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{AvailabilityRepository, AvailabilityRepositoryError};
use crate::domain::{
    ExceptionId, MemberAvailability, MemberId, ScheduleException, weekday_index,
};

use super::diesel_error_mapping;
use super::models::{AvailabilityRow, ExceptionRow, NewAvailabilityRow, NewExceptionRow};
use super::pool::{DbPool, PoolError};
use super::schema::{member_availability, schedule_exceptions};

/// Diesel-backed implementation of the availability repository port.
#[derive(Clone)]
pub struct DieselAvailabilityRepository {
    pool: DbPool,
}

impl DieselAvailabilityRepository {
    /// Build the availability adapter over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AvailabilityRepositoryError {
    diesel_error_mapping::map_pool_error(error, AvailabilityRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AvailabilityRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        AvailabilityRepositoryError::query,
        AvailabilityRepositoryError::connection,
    )
}

fn rows_to_rules(
    rows: Vec<AvailabilityRow>,
) -> Result<Vec<MemberAvailability>, AvailabilityRepositoryError> {
    rows.into_iter()
        .map(|row| {
            MemberAvailability::try_from(row)
                .map_err(|err| AvailabilityRepositoryError::query(err.to_string()))
        })
        .collect()
}

fn rows_to_exceptions(
    rows: Vec<ExceptionRow>,
) -> Result<Vec<ScheduleException>, AvailabilityRepositoryError> {
    rows.into_iter()
        .map(|row| {
            ScheduleException::try_from(row)
                .map_err(|err| AvailabilityRepositoryError::query(err.to_string()))
        })
        .collect()
}

#[async_trait]
impl AvailabilityRepository for DieselAvailabilityRepository {
    async fn rules_for_weekday(
        &self,
        weekday: Weekday,
    ) -> Result<Vec<MemberAvailability>, AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AvailabilityRow> = member_availability::table
            .filter(member_availability::day_of_week.eq(i16::from(weekday_index(weekday))))
            .order((
                member_availability::member_id.asc(),
                member_availability::start_time.asc(),
            ))
            .select(AvailabilityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_rules(rows)
    }

    async fn exceptions_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleException>, AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ExceptionRow> = schedule_exceptions::table
            .filter(schedule_exceptions::date.eq(date))
            .order(schedule_exceptions::created_at.asc())
            .select(ExceptionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_exceptions(rows)
    }

    async fn rules_for_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<MemberAvailability>, AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AvailabilityRow> = member_availability::table
            .filter(member_availability::member_id.eq(member_id.as_uuid()))
            .order((
                member_availability::day_of_week.asc(),
                member_availability::start_time.asc(),
            ))
            .select(AvailabilityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_rules(rows)
    }

    async fn exceptions_for_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<ScheduleException>, AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ExceptionRow> = schedule_exceptions::table
            .filter(schedule_exceptions::member_id.eq(member_id.as_uuid()))
            .order((
                schedule_exceptions::date.asc(),
                schedule_exceptions::start_time.asc(),
            ))
            .select(ExceptionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_exceptions(rows)
    }

    async fn replace_rules(
        &self,
        member_id: &MemberId,
        rules: &[MemberAvailability],
    ) -> Result<(), AvailabilityRepositoryError> {
        let member = *member_id.as_uuid();
        let rows: Vec<NewAvailabilityRow<'_>> = rules.iter().map(NewAvailabilityRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::delete(
                    member_availability::table
                        .filter(member_availability::member_id.eq(member)),
                )
                .execute(conn)
                .await?;

                if !rows.is_empty() {
                    diesel::insert_into(member_availability::table)
                        .values(&rows)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn insert_exception(
        &self,
        exception: &ScheduleException,
    ) -> Result<(), AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(schedule_exceptions::table)
            .values(&NewExceptionRow::from(exception))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_exception(
        &self,
        exception_id: &ExceptionId,
    ) -> Result<bool, AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            schedule_exceptions::table.filter(schedule_exceptions::id.eq(exception_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
