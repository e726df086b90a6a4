//! Driving port for registering users.
//!
//! Inbound adapters hand over untrusted input and receive a classified
//! outcome. Expected rejections are values; only unexpected failures travel
//! as `Err` to the process-wide error boundary.

use async_trait::async_trait;

use crate::domain::{Error, RegistrationInput, UserId};

/// Result of a registration attempt that the caller can act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The user was stored.
    Created(UserId),
    /// Input validation or a store constraint rejected the request. Messages
    /// keep the order in which rules were declared.
    Rejected(Vec<String>),
}

/// Domain use-case port for user registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Validate, hash and persist a new user.
    async fn register(&self, input: RegistrationInput) -> Result<RegistrationOutcome, Error>;
}
