//! Optional side store that mirrors newly registered users.
//!
//! Keeps a per-process record of users created since startup, separate from
//! the primary repository. Nothing is recorded unless a store is injected
//! into the registration service.

use crate::domain::User;

/// Driven port for recording registered users, keyed by identifier.
#[cfg_attr(test, mockall::automock)]
pub trait UserSeedStore: Send + Sync {
    /// Record a newly created user.
    fn record(&self, user: &User);

    /// Number of recorded users.
    fn len(&self) -> usize;

    /// Whether nothing has been recorded yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
