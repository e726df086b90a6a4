//! Port abstraction for user persistence adapters and their errors.
//!
//! Adapters classify every failure into one of the variants below so the
//! domain can pattern match on the kind instead of inspecting error names.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, NewUser, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The store rejected the record: a uniqueness or model-level rule
        /// failed. Each message is safe to show to the client.
        ConstraintViolation { messages: Vec<String> } =>
            "user record violates store constraints: {messages:?}",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Driven port for storing and reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, assigning its identifier.
    ///
    /// Must reject a duplicate email address with
    /// [`UserPersistenceError::ConstraintViolation`].
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;
}

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        match error {
            UserPersistenceError::ConstraintViolation { messages } => {
                Error::invalid_request("user record rejected by store")
                    .with_details(serde_json::json!({ "messages": messages }))
            }
            UserPersistenceError::Connection { message } => Error::service_unavailable(message),
            UserPersistenceError::Query { message } => Error::internal(message),
        }
    }
}
