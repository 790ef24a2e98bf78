//! Embedded PostgreSQL for the Diesel repository suites.
//!
//! One cluster is shared per test binary. Each test gets its own database
//! cloned from a template that already has the migrations applied; the
//! template name carries a hash of `migrations/` so schema edits provision a
//! fresh one.
//!
//! Set `SKIP_TEST_CLUSTER=1` to skip these tests where the cluster cannot
//! start; otherwise a setup failure fails the test.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const TEMPLATE_NAME_PREFIX: &str = "hospadmin_template";
const SETUP_RETRIES: usize = 5;
const SETUP_RETRY_DELAY: Duration = Duration::from_millis(500);

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Returns true when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip (returning `None`) or panic, depending on `SKIP_TEST_CLUSTER`.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn with_retries<T>(
    mut attempt_once: impl FnMut(usize) -> Result<T, String>,
) -> Result<T, String> {
    let mut last_error = String::from("no attempts made");
    for attempt in 1..=SETUP_RETRIES {
        match attempt_once(attempt) {
            Ok(value) => return Ok(value),
            Err(error) => last_error = error,
        }
        if attempt < SETUP_RETRIES {
            std::thread::sleep(SETUP_RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// The cluster shared by every test in this binary.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    with_retries(|attempt| {
        shared_cluster_handle()
            .map_err(|err| format!("start cluster: attempt {attempt}/{SETUP_RETRIES}: {err:?}"))
    })
}

fn template_database_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err:?}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err}"))?;
    Ok(())
}

fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        migrate_schema(&cluster.connection().database_url(&template_name))?;
    }
    Ok(template_name)
}

/// A migrated database private to one test, dropped with the handle.
pub fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    with_retries(|attempt| {
        let template_name = ensure_template_database(cluster)
            .map_err(|err| format!("attempt {attempt}/{SETUP_RETRIES}: {err}"))?;
        let db_name = format!("test_{}", Uuid::new_v4().simple());
        cluster
            .temporary_database_from_template(db_name.as_str(), template_name.as_str())
            .map_err(|err| {
                format!(
                    "create database from template: attempt {attempt}/{SETUP_RETRIES}: {err:?}"
                )
            })
    })
}
