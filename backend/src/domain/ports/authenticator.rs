//! Driving port resolving request credentials to the current user.

use async_trait::async_trait;

use crate::domain::{BasicCredentials, Error, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Return the user owning the credentials, or an unauthorised error.
    async fn authenticate(&self, credentials: &BasicCredentials) -> Result<User, Error>;
}
