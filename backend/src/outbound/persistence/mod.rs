//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the scheduling driven ports, backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between rows and domain
//!   values. Validation runs again on read through the domain constructors.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Atomic checks**: the assignment insert holds a row lock on its slot
//!   while checking duplicates and capacity; status updates are
//!   compare-and-set on the previous status.
//!
//! # Example
//!
//! ```ignore
//! use scheduling::outbound::persistence::{DbPool, DieselSlotRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/rota")).await?;
//! let slots = DieselSlotRepository::new(pool.clone());
//! ```

mod diesel_assignment_repository;
mod diesel_availability_repository;
mod diesel_error_mapping;
mod diesel_member_directory;
mod diesel_schedule_repository;
mod diesel_slot_repository;
mod migrations;
mod models;
mod pool;
mod schema;

use crate::domain::AssignmentStatus;

pub use diesel_assignment_repository::DieselAssignmentRepository;
pub use diesel_availability_repository::DieselAvailabilityRepository;
pub use diesel_member_directory::DieselMemberDirectory;
pub use diesel_schedule_repository::DieselScheduleRepository;
pub use diesel_slot_repository::DieselSlotRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

/// Every repository sharing one pool.
#[derive(Clone)]
pub struct DieselStore {
    pub schedules: DieselScheduleRepository,
    pub slots: DieselSlotRepository,
    pub assignments: DieselAssignmentRepository,
    pub availability: DieselAvailabilityRepository,
    pub members: DieselMemberDirectory,
}

impl DieselStore {
    /// Build every repository over one shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            schedules: DieselScheduleRepository::new(pool.clone()),
            slots: DieselSlotRepository::new(pool.clone()),
            assignments: DieselAssignmentRepository::new(pool.clone()),
            availability: DieselAvailabilityRepository::new(pool.clone()),
            members: DieselMemberDirectory::new(pool),
        }
    }
}

/// Stored status strings of assignments that hold a seat.
fn seat_holding_statuses() -> Vec<&'static str> {
    AssignmentStatus::ALL
        .iter()
        .copied()
        .filter(|status| status.counts_toward_capacity())
        .map(AssignmentStatus::as_str)
        .collect()
}
