//! Outbound adapters implementing the scheduling driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM.
//! - **memory**: a mutex-guarded in-process store with the same atomicity.
//!
//! Adapters translate between domain values and storage. Scheduling rules
//! stay in the domain services.

pub mod memory;
pub mod persistence;
