//! Scheduling configuration loaded via OrthoConfig.
//!
//! Values come from CLI arguments, `SCHEDULING_*` environment variables, and
//! configuration files, in OrthoConfig's usual precedence.

use chrono::FixedOffset;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{CapacityPolicy, SchedulingPolicy};

const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_MAX_PARTICIPANTS: u32 = 1;

/// Errors raised while turning raw settings into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The capacity policy is neither `reject` nor `warn`.
    #[error("unknown capacity policy `{0}`; expected `reject` or `warn`")]
    CapacityPolicy(String),
    /// The offset lies outside plus or minus 18 hours.
    #[error("utc offset of {0} minutes is out of range")]
    UtcOffset(i32),
    /// The default seat count is zero.
    #[error("default max participants must be at least 1")]
    ZeroDefaultCapacity,
    /// No database URL was supplied.
    #[error("no database url configured; set SCHEDULING_DATABASE_URL")]
    MissingDatabaseUrl,
}

/// Settings for the scheduling services and their store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SCHEDULING")]
pub struct SchedulingSettings {
    /// `reject` (default) or `warn` when a slot is full.
    pub capacity_policy: Option<String>,
    /// Offset of the organisation's wall clock from UTC, in minutes.
    ///
    /// The offset is fixed. Daylight saving changes are not followed, so
    /// organisations that observe them must update this value when the
    /// clocks change or slot status and attendance timing drift by an hour.
    pub utc_offset_minutes: Option<i32>,
    /// Capacity applied when slot creation omits one.
    pub default_max_participants: Option<u32>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
}

impl SchedulingSettings {
    /// Build the policy the services consult on every request.
    pub fn policy(&self) -> Result<SchedulingPolicy, SettingsError> {
        let capacity_policy = match self.capacity_policy.as_deref() {
            None => CapacityPolicy::default(),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| SettingsError::CapacityPolicy(raw.to_owned()))?,
        };
        let minutes = self.utc_offset_minutes.unwrap_or(0);
        let utc_offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(SettingsError::UtcOffset(minutes))?;
        let default_max_participants = self
            .default_max_participants
            .unwrap_or(DEFAULT_MAX_PARTICIPANTS);
        if default_max_participants == 0 {
            return Err(SettingsError::ZeroDefaultCapacity);
        }

        Ok(SchedulingPolicy {
            capacity_policy,
            utc_offset,
            default_max_participants,
        })
    }

    /// Return the configured database URL.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Return the pool size, falling back to the default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for scheduling configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARIABLES: [&str; 5] = [
        "SCHEDULING_CAPACITY_POLICY",
        "SCHEDULING_UTC_OFFSET_MINUTES",
        "SCHEDULING_DEFAULT_MAX_PARTICIPANTS",
        "SCHEDULING_DATABASE_URL",
        "SCHEDULING_POOL_MAX_SIZE",
    ];

    fn load_from_empty_args() -> SchedulingSettings {
        SchedulingSettings::load_from_iter([OsString::from("scheduling")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_reject_overbooking_in_utc() {
        let _guard = lock_env(VARIABLES.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        let policy = settings.policy().expect("default policy");
        assert_eq!(policy, SchedulingPolicy::default());
        assert_eq!(settings.pool_max_size(), DEFAULT_POOL_MAX_SIZE);
        assert_eq!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("SCHEDULING_CAPACITY_POLICY", Some("warn".to_owned())),
            ("SCHEDULING_UTC_OFFSET_MINUTES", Some("60".to_owned())),
            ("SCHEDULING_DEFAULT_MAX_PARTICIPANTS", Some("3".to_owned())),
            (
                "SCHEDULING_DATABASE_URL",
                Some("postgres://localhost/rota".to_owned()),
            ),
            ("SCHEDULING_POOL_MAX_SIZE", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();
        let policy = settings.policy().expect("policy");
        assert_eq!(policy.capacity_policy, CapacityPolicy::Warn);
        assert_eq!(policy.utc_offset.local_minus_utc(), 3600);
        assert_eq!(policy.default_max_participants, 3);
        assert_eq!(settings.database_url(), Ok("postgres://localhost/rota"));
        assert_eq!(settings.pool_max_size(), 4);
    }

    #[rstest]
    #[case::unknown_policy(Some("maybe"), None, None)]
    #[case::offset_beyond_a_day(None, Some(24 * 60), None)]
    #[case::zero_capacity(None, None, Some(0))]
    fn invalid_values_are_reported(
        #[case] capacity_policy: Option<&str>,
        #[case] utc_offset_minutes: Option<i32>,
        #[case] default_max_participants: Option<u32>,
    ) {
        let settings = SchedulingSettings {
            capacity_policy: capacity_policy.map(str::to_owned),
            utc_offset_minutes,
            default_max_participants,
            database_url: None,
            pool_max_size: None,
        };
        assert!(settings.policy().is_err());
    }
}
