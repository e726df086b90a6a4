//! `UserSeedStore` held in a mutex-guarded map.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::ports::UserSeedStore;
use crate::domain::{User, UserId};

/// Records registered users keyed by identifier.
#[derive(Debug, Default)]
pub struct InMemoryUserSeedStore {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserSeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> MutexGuard<'_, HashMap<UserId, User>> {
        self.users.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl UserSeedStore for InMemoryUserSeedStore {
    fn record(&self, user: &User) {
        self.users().insert(*user.id(), user.clone());
    }

    fn len(&self) -> usize {
        self.users().len()
    }
}
