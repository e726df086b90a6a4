//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL user repository via Diesel.
//! - **memory**: process-local repository and seed store.
//! - **hashing**: bcrypt password hasher.
//!
//! Adapters translate between domain types and infrastructure types; they
//! hold no business rules.

pub mod hashing;
pub mod memory;
pub mod persistence;
