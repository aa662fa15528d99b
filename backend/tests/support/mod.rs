//! Embedded PostgreSQL helpers shared by the adapter suites.
//!
//! Databases come from the process-wide cluster that
//! `pg-embed-setup-unpriv` keeps alive for the test binary. Each call hands
//! out a fresh database, so suites never observe each other's rows.

use std::thread;
use std::time::Duration;

use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;

const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);
const TEST_PASSWORD: &str = "ecoactions_embedded_test";

/// Returns true when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when the cluster is optional, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Create an empty database on the shared cluster.
pub fn provision_database() -> Result<TemporaryDatabase, String> {
    // The cluster bootstraps once per process; pin its password while it does.
    let _env = env_lock::lock_env([(
        "PG_PASSWORD",
        Some(std::env::var("PG_PASSWORD").unwrap_or_else(|_| TEST_PASSWORD.to_owned())),
    )]);

    let mut attempt = 1;
    let cluster = loop {
        match shared_cluster_handle() {
            Ok(handle) => break handle,
            Err(err) if attempt < CLUSTER_RETRIES => {
                eprintln!("pg-embed: attempt {attempt}/{CLUSTER_RETRIES} failed: {err:?}");
                thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
            Err(err) => return Err(format!("shared cluster: {err:?}")),
        }
    };
    cluster
        .temporary_database(format!("eco_{}", uuid::Uuid::new_v4().simple()))
        .map_err(|err| format!("create database: {err:?}"))
}
