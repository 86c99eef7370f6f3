//! PostgreSQL-backed `ScheduleRepository`.
//!
//! Deleting a schedule relies on `ON DELETE CASCADE` to remove its slots and
//! their assignments in the same statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ScheduleRepository, ScheduleRepositoryError};
use crate::domain::{Schedule, ScheduleId, ScheduleStatus};

use super::diesel_error_mapping::{self, is_unique_violation};
use super::models::{NewScheduleRow, ScheduleRow};
use super::pool::{DbPool, PoolError};
use super::schema::schedules;

const PRIMARY_KEY: &str = "schedules_pkey";

/// Diesel-backed implementation of the schedule repository port.
#[derive(Clone)]
pub struct DieselScheduleRepository {
    pool: DbPool,
}

impl DieselScheduleRepository {
    /// Build the schedule adapter over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ScheduleRepositoryError {
    diesel_error_mapping::map_pool_error(error, ScheduleRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ScheduleRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        ScheduleRepositoryError::query,
        ScheduleRepositoryError::connection,
    )
}

fn row_to_schedule(row: ScheduleRow) -> Result<Schedule, ScheduleRepositoryError> {
    Schedule::try_from(row).map_err(|err| ScheduleRepositoryError::query(err.to_string()))
}

#[async_trait]
impl ScheduleRepository for DieselScheduleRepository {
    async fn insert(&self, schedule: &Schedule) -> Result<(), ScheduleRepositoryError> {
        let row = NewScheduleRow::from_schedule(schedule).map_err(|err| {
            ScheduleRepositoryError::query(format!("serialise recurring pattern: {err}"))
        })?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(schedules::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err, PRIMARY_KEY) {
                    ScheduleRepositoryError::already_exists(schedule.id().to_string())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn find_by_id(
        &self,
        schedule_id: &ScheduleId,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = schedules::table
            .filter(schedules::id.eq(schedule_id.as_uuid()))
            .select(ScheduleRow::as_select())
            .first::<ScheduleRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_schedule).transpose()
    }

    async fn list(
        &self,
        status: Option<ScheduleStatus>,
    ) -> Result<Vec<Schedule>, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = schedules::table
            .select(ScheduleRow::as_select())
            .order((schedules::start_date.asc(), schedules::name.asc()))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(schedules::status.eq(status.as_str()));
        }

        let rows: Vec<ScheduleRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_schedule).collect()
    }

    async fn update_status(
        &self,
        schedule_id: &ScheduleId,
        expected: ScheduleStatus,
        next: ScheduleStatus,
    ) -> Result<bool, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            schedules::table.filter(
                schedules::id
                    .eq(schedule_id.as_uuid())
                    .and(schedules::status.eq(expected.as_str())),
            ),
        )
        .set((
            schedules::status.eq(next.as_str()),
            schedules::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated == 1)
    }

    async fn delete(&self, schedule_id: &ScheduleId) -> Result<bool, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted =
            diesel::delete(schedules::table.filter(schedules::id.eq(schedule_id.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping.

    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let error = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(error, ScheduleRepositoryError::Connection { .. }));
        assert!(error.to_string().contains("connection refused"));
    }

    #[rstest]
    fn closed_connections_become_connection_errors() {
        let error = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        ));

        assert!(matches!(error, ScheduleRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn corrupt_rows_become_query_errors() {
        let row = ScheduleRow {
            id: uuid::Uuid::new_v4(),
            name: "  ".to_owned(),
            description: None,
            kind: "weekly".to_owned(),
            category: "other".to_owned(),
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"),
            end_date: None,
            is_recurring: false,
            recurring_pattern: None,
            territory_scope: None,
            status: "draft".to_owned(),
            color: None,
            created_by: None,
            created_at: chrono::Utc::now(),
        };

        assert!(matches!(
            row_to_schedule(row),
            Err(ScheduleRepositoryError::Query { .. })
        ));
    }
}
