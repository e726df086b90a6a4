//! Process-local adapters for running without PostgreSQL and for tests.

mod seed_store;
mod user_repository;

pub use seed_store::InMemoryUserSeedStore;
pub use user_repository::InMemoryUserRepository;
