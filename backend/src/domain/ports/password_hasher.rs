//! Port for one-way salted password hashing.
//!
//! Implementations are synchronous and CPU bound; callers on the async
//! runtime move them onto a blocking thread.

use crate::domain::{Password, PasswordDigest};

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// The hasher could not produce a digest.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored digest could not be parsed for verification.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
    }
}

/// Driven port for salted one-way hashing with a fixed work factor.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password. Two calls with the same input yield
    /// different digests.
    fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError>;

    /// Check a plaintext password against a stored digest.
    fn verify(
        &self,
        password: &Password,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError>;
}
