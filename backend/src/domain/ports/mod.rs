//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod authenticator;
mod password_hasher;
mod user_registration;
mod user_repository;
mod user_seed_store;

#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::Authenticator;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::{RegistrationOutcome, UserRegistration};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_seed_store::MockUserSeedStore;
pub use user_seed_store::UserSeedStore;
