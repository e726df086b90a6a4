//! Server entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};
use userbase::domain::ports::UserSeedStore;
use userbase::inbound::http::health::HealthState;
use userbase::outbound::memory::InMemoryUserSeedStore;
use userbase::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

async fn connect_database(database_url: &str) -> io::Result<DbPool> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    info!(applied, "database schema up to date");

    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(io::Error::other)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let settings = ServerSettings::from_args(std::env::args_os())?;

    let mut config = ServerConfig::new(settings.bind_addr())
        .with_bcrypt_cost(settings.bcrypt_cost())
        .with_persistence_timeout(settings.persistence_timeout());
    if let Some(url) = settings.database_url() {
        config = config.with_db_pool(connect_database(url).await?);
    }
    let seeds = settings
        .record_seeds
        .then(|| Arc::new(InMemoryUserSeedStore::new()));
    if let Some(store) = &seeds {
        config = config.with_seed_store(store.clone());
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let outcome = server.await;
    health_state.mark_unhealthy();
    if let Some(store) = seeds {
        info!(recorded = store.len(), "seed store released");
    }
    outcome
}
