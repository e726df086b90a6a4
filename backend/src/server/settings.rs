//! Server settings loaded via OrthoConfig.
//!
//! Every value can come from a `--flag`, a `USERBASE_*` environment variable
//! or a config file; unset values fall back to the defaults below.

use std::ffi::OsString;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use userbase::domain::DEFAULT_PERSISTENCE_TIMEOUT;
use userbase::outbound::hashing::DEFAULT_BCRYPT_COST;

const DEFAULT_PORT: u16 = 8080;

/// Runtime settings for the `userbase` server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERBASE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Users are kept in memory when unset.
    pub database_url: Option<String>,
    /// bcrypt work factor.
    pub bcrypt_cost: Option<u32>,
    /// Seconds to wait for the user store before failing a request.
    pub persistence_timeout_secs: Option<u64>,
    /// Keep an in-memory copy of every registered user for fixture tooling.
    #[ortho_config(default = false)]
    pub record_seeds: bool,
}

impl ServerSettings {
    /// Merge defaults, config file, `USERBASE_*` variables and `args`.
    ///
    /// # Errors
    /// Returns an [`io::Error`] describing the first source that fails to
    /// parse.
    pub fn from_args<I>(args: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        Self::load_from_iter(args)
            .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Database URL, treating an empty value as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST)
    }

    pub fn persistence_timeout(&self) -> Duration {
        self.persistence_timeout_secs
            .map_or(DEFAULT_PERSISTENCE_TIMEOUT, Duration::from_secs)
    }
}
