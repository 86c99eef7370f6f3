//! Operations CLI for the scheduling store.
//!
//! Applies migrations, bulk-generates slots, prints candidate rankings, and
//! reports participation statistics against the configured PostgreSQL
//! database. Results are printed as JSON on stdout; logs go to stderr.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use scheduling::config::SchedulingSettings;
use scheduling::domain::ports::{
    AssignmentQuery, CandidateQuery, GenerateSlotsRequest, SlotCommand,
};
use scheduling::domain::{
    ActorId, AssignmentService, CandidateService, MemberId, ScheduleId, SlotId, SlotService,
};
use scheduling::outbound::persistence::{
    DbPool, DieselStore, PoolConfig, run_pending_migrations,
};
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `scheduling-admin` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "scheduling-admin",
    about = "Administer the shift scheduling store",
    version
)]
struct CliArgs {
    /// Overrides `SCHEDULING_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Expand a weekly template into dated slots.
    GenerateSlots(GenerateArgs),
    /// Rank members for a slot.
    Suggest {
        #[arg(long = "slot-id")]
        slot_id: SlotId,
    },
    /// Print a member's participation statistics.
    Stats {
        #[arg(long = "member-id")]
        member_id: MemberId,
    },
}

#[derive(Debug, clap::Args)]
struct GenerateArgs {
    #[arg(long = "schedule-id")]
    schedule_id: ScheduleId,
    /// First date, inclusive (`YYYY-MM-DD`).
    #[arg(long)]
    from: NaiveDate,
    /// Last date, inclusive (`YYYY-MM-DD`).
    #[arg(long)]
    to: NaiveDate,
    /// Weekday indices, 0 = Sunday, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    days: Vec<u8>,
    /// Shift start (`HH:MM`).
    #[arg(long, value_parser = parse_time)]
    start: NaiveTime,
    /// Shift end (`HH:MM`).
    #[arg(long, value_parser = parse_time)]
    end: NaiveTime,
    #[arg(long)]
    name: String,
    #[arg(long)]
    location: Option<String>,
    /// Seats per slot; defaults to `SCHEDULING_DEFAULT_MAX_PARTICIPANTS`.
    #[arg(long = "max-participants")]
    max_participants: Option<u32>,
    #[arg(long = "min-participants")]
    min_participants: Option<u32>,
    /// Acting administrator recorded in the logs.
    #[arg(long)]
    actor: Option<ActorId>,
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
        .map_err(|error| format!("expected HH:MM: {error}"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let mut settings = SchedulingSettings::load_from_iter([OsString::from("scheduling-admin")])
        .map_err(|error| eyre!("failed to load scheduling settings: {error}"))?;
    if args.database_url.is_some() {
        settings.database_url = args.database_url;
    }
    let policy = settings.policy()?;
    let pool_config = PoolConfig::from_settings(&settings)?;

    if matches!(args.command, Command::Migrate) {
        let applied = run_pending_migrations(pool_config.database_url()).await?;
        return print_json(&applied);
    }

    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to create database pool")?;
    let store = DieselStore::new(pool);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    match args.command {
        Command::Migrate => Ok(()),
        Command::GenerateSlots(generate) => {
            let service = SlotService::new(
                Arc::new(store.schedules),
                Arc::new(store.slots),
                clock,
                policy,
            );
            let actor = generate.actor.unwrap_or_else(ActorId::random);
            let slots = service
                .generate_slots(GenerateSlotsRequest {
                    actor,
                    schedule_id: generate.schedule_id,
                    start_date: generate.from,
                    end_date: generate.to,
                    days_of_week: generate.days,
                    start_time: generate.start,
                    end_time: generate.end,
                    name: generate.name,
                    location: generate.location,
                    location_details: None,
                    max_participants: generate.max_participants,
                    min_participants: generate.min_participants,
                    notes: None,
                })
                .await?;
            info!(count = slots.len(), "slot generation finished");
            print_json(&slots)
        }
        Command::Suggest { slot_id } => {
            let service = CandidateService::new(
                Arc::new(store.slots),
                Arc::new(store.assignments),
                Arc::new(store.availability),
                Arc::new(store.members),
            );
            print_json(&service.suggest_candidates(&slot_id).await?)
        }
        Command::Stats { member_id } => {
            let service = AssignmentService::new(
                Arc::new(store.slots),
                Arc::new(store.assignments),
                Arc::new(store.members),
                clock,
                policy,
            );
            print_json(&service.get_participation_stats(&member_id).await?)
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Unit tests for argument parsing.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("08:00", 8, 0)]
    #[case(" 17:30 ", 17, 30)]
    #[case("06:15:00", 6, 15)]
    fn times_accept_hours_and_minutes(#[case] raw: &str, #[case] hour: u32, #[case] minute: u32) {
        let parsed = parse_time(raw).expect("valid time");
        assert_eq!(parsed, NaiveTime::from_hms_opt(hour, minute, 0).expect("valid"));
    }

    #[rstest]
    fn malformed_times_are_rejected() {
        assert!(parse_time("8am").is_err());
    }

    #[rstest]
    fn generate_slots_parses_comma_separated_weekdays() {
        let args = CliArgs::try_parse_from([
            "scheduling-admin",
            "generate-slots",
            "--schedule-id",
            "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "--from",
            "2025-03-03",
            "--to",
            "2025-03-09",
            "--days",
            "1,3,5",
            "--start",
            "08:00",
            "--end",
            "10:00",
            "--name",
            "Gate",
        ])
        .expect("valid arguments");

        let Command::GenerateSlots(generate) = args.command else {
            panic!("expected generate-slots");
        };
        assert_eq!(generate.days, vec![1, 3, 5]);
        assert_eq!(generate.max_participants, None);
    }

    #[rstest]
    fn the_database_url_can_follow_the_subcommand() {
        let args = CliArgs::try_parse_from([
            "scheduling-admin",
            "migrate",
            "--database-url",
            "postgres://localhost/rota",
        ])
        .expect("valid arguments");
        assert_eq!(args.database_url.as_deref(), Some("postgres://localhost/rota"));
    }
}
