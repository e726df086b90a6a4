//! Embedded PostgreSQL helpers for the Diesel adapter suite.
//!
//! Suites only touch a real cluster when `RUN_PG_EMBEDDED=1`; otherwise the
//! fixture yields `None` and each test prints a skip marker. Once enabled, a
//! cluster that fails to start fails the test instead of hiding the breakage.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use uuid::Uuid;

use userbase::outbound::persistence::run_pending_migrations;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Whether the embedded cluster suites are switched on.
pub fn embedded_postgres_enabled() -> bool {
    std::env::var("RUN_PG_EMBEDDED").as_deref() == Ok("1")
}

/// Migrated database on a private cluster; the cluster stops on drop.
pub struct MigratedDatabase {
    pub url: String,
    _cluster: TestCluster,
}

fn pg_embed_dirs() -> Result<(String, String), String> {
    let base = std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("target"))
        .join("pg-embed")
        .join(format!("bootstrap-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir).map_err(|err| err.to_string())?;
    std::fs::create_dir_all(&data_dir).map_err(|err| err.to_string())?;
    Ok((
        runtime_dir.to_string_lossy().into_owned(),
        data_dir.to_string_lossy().into_owned(),
    ))
}

/// Start a cluster, keeping its install and data directories under `target/`
/// unless `PG_RUNTIME_DIR` and `PG_DATA_DIR` are already set.
fn test_cluster() -> Result<TestCluster, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env = if needs_override {
        let (runtime_dir, data_dir) = pg_embed_dirs()?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir)),
            ("PG_DATA_DIR", Some(data_dir)),
        ]))
    } else {
        None
    };

    TestCluster::new().map_err(|err| format!("{err:?}"))
}

/// Create an empty database on `cluster` and bring its schema up to date.
fn create_migrated_database(cluster: &TestCluster) -> Result<String, String> {
    let name = format!("userbase_{}", Uuid::new_v4().simple());
    let admin_url = cluster.connection().database_url("postgres");
    let mut admin = Client::connect(&admin_url, NoTls).map_err(|err| err.to_string())?;
    admin
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| err.to_string())?;

    let url = cluster.connection().database_url(&name);
    run_pending_migrations(&url).map_err(|err| err.to_string())?;
    Ok(url)
}

/// Provision a migrated database, or `None` when the suite is switched off.
///
/// # Panics
/// Panics when the suite is enabled but the cluster cannot be prepared.
pub fn migrated_database() -> Option<MigratedDatabase> {
    if !embedded_postgres_enabled() {
        return None;
    }
    let prepared = test_cluster().and_then(|cluster| {
        let url = create_migrated_database(&cluster)?;
        Ok(MigratedDatabase {
            url,
            _cluster: cluster,
        })
    });
    match prepared {
        Ok(database) => Some(database),
        Err(reason) => panic!("embedded Postgres setup failed: {reason}"),
    }
}

/// Count stored users with the given email address.
pub fn count_users_with_email(url: &str, email: &str) -> Result<i64, postgres::Error> {
    let mut client = Client::connect(url, NoTls)?;
    let row = client.query_one(
        "SELECT COUNT(*) FROM users WHERE email_address = $1",
        &[&email],
    )?;
    Ok(row.get(0))
}
