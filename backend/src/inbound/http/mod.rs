//! HTTP inbound adapter exposing the users resource and health checks.

pub mod auth;
pub mod error;
pub mod health;
pub mod state;
pub mod users;

pub use error::ApiResult;
