//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use userbase::domain::DEFAULT_PERSISTENCE_TIMEOUT;
use userbase::domain::ports::UserSeedStore;
use userbase::outbound::hashing::DEFAULT_BCRYPT_COST;
use userbase::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) bcrypt_cost: u32,
    pub(crate) persistence_timeout: Duration,
    pub(crate) seed_store: Option<Arc<dyn UserSeedStore>>,
}

impl ServerConfig {
    /// In-memory storage, bcrypt cost 10, 10 s store timeout.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            persistence_timeout: DEFAULT_PERSISTENCE_TIMEOUT,
            seed_store: None,
        }
    }

    /// Store users in PostgreSQL instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    #[must_use]
    pub fn with_persistence_timeout(mut self, timeout: Duration) -> Self {
        self.persistence_timeout = timeout;
        self
    }

    /// Mirror every registered user into `store`.
    #[must_use]
    pub fn with_seed_store(mut self, store: Arc<dyn UserSeedStore>) -> Self {
        self.seed_store = Some(store);
        self
    }
}
