//! Embedded PostgreSQL helpers shared by the Diesel integration suites.
//!
//! Each test receives its own temporary database on a process-wide cluster,
//! migrated with the crate's embedded migrations. When the cluster cannot be
//! started, `SKIP_TEST_CLUSTER=1` turns the failure into a skipped test.

use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use scheduling::outbound::persistence::run_pending_migrations;
use tokio::runtime::Runtime;

/// Returns true when `SKIP_TEST_CLUSTER` is "1", "true", or "yes".
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when allowed, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    pg_embedded_setup_unpriv::test_support::shared_cluster_handle()
        .map_err(|error| format!("start shared cluster: {error:?}"))
}

/// Create a fresh database and bring it to the latest schema.
pub fn migrated_database(
    cluster: &ClusterHandle,
    runtime: &Runtime,
) -> Result<TemporaryDatabase, String> {
    let name = format!("test_{}", uuid::Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(name.as_str())
        .map_err(|error| format!("create temporary database: {error:?}"))?;
    let url = database.url().to_string();
    runtime
        .block_on(run_pending_migrations(&url))
        .map_err(|error| format!("migrate {url}: {error}"))?;
    Ok(database)
}
