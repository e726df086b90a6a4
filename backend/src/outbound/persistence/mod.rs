//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; only the repository, the pool and the migration runner
//! are exported.
//!
//! # Example
//!
//! ```ignore
//! use userbase::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/userbase")).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
