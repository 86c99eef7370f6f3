//! Shift scheduling core.
//!
//! Schedules own dated slots; members declare weekly availability and
//! date exceptions; services generate slots, rank candidates, and drive the
//! assignment lifecycle over pluggable stores.

pub mod config;
pub mod domain;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
