//! Test utilities for the scheduling crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). Only
//! compiled for tests or with the `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// A clock tests can move forward between calls.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Start at `hour:minute` UTC on `date`.
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        Self::new(utc_at(date, hour, minute))
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    /// Move forward by `minutes`.
    pub fn advance_minutes(&self, minutes: i64) {
        *self.lock_clock() += TimeDelta::minutes(minutes);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// `hour:minute` UTC on `date`; panics on an impossible time.
pub fn utc_at(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    let Some(naive) = date.and_hms_opt(hour, minute, 0) else {
        panic!("invalid fixture time {hour}:{minute}");
    };
    Utc.from_utc_datetime(&naive)
}

/// Calendar date shorthand for fixtures.
pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid fixture date {year}-{month}-{day}"),
    }
}
