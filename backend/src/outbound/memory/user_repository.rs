//! `UserRepository` held in a mutex-guarded map.
//!
//! Enforces the same uniqueness rule as the PostgreSQL schema: one user per
//! email address, compared byte for byte.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId};

const DUPLICATE_EMAIL_MESSAGE: &str = "An account with this email address already exists";

/// In-memory user store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> MutexGuard<'_, HashMap<UserId, User>> {
        self.users.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.users();
        if users
            .values()
            .any(|existing| existing.email_address() == &user.email_address)
        {
            return Err(UserPersistenceError::constraint_violation(vec![
                DUPLICATE_EMAIL_MESSAGE.to_owned(),
            ]));
        }

        let created = User::from_new(UserId::random(), user.clone());
        users.insert(*created.id(), created.clone());
        Ok(created)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users()
            .values()
            .find(|user| user.email_address() == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PasswordDigest, PersonName};
    use rstest::{fixture, rstest};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: PersonName::new("Jane").expect("first"),
            last_name: PersonName::new("Doe").expect("last"),
            email_address: EmailAddress::new(email).expect("email"),
            password_digest: PasswordDigest::new("$2b$04$digest").expect("digest"),
        }
    }

    #[fixture]
    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn created_users_are_found_by_email(repo: InMemoryUserRepository) {
        let user = repo
            .create(&new_user("jane@example.com"))
            .await
            .expect("create");

        let by_email = repo
            .find_by_email(&EmailAddress::new("jane@example.com").expect("email"))
            .await
            .expect("lookup");

        assert_eq!(by_email, Some(user));
    }

    #[rstest]
    #[tokio::test]
    async fn each_user_gets_a_fresh_id(repo: InMemoryUserRepository) {
        let first = repo.create(&new_user("a@example.com")).await.expect("create");
        let second = repo.create(&new_user("b@example.com")).await.expect("create");

        assert_ne!(first.id(), second.id());
        assert_eq!(repo.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_a_constraint_violation(repo: InMemoryUserRepository) {
        repo.create(&new_user("jane@example.com"))
            .await
            .expect("first insert");

        let err = repo
            .create(&new_user("jane@example.com"))
            .await
            .expect_err("duplicate");

        assert_eq!(
            err,
            UserPersistenceError::constraint_violation(vec![DUPLICATE_EMAIL_MESSAGE.to_owned()])
        );
        assert_eq!(repo.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_lookups_return_none(repo: InMemoryUserRepository) {
        assert!(repo.is_empty());
        let unknown = EmailAddress::new("ghost@example.com").expect("email");
        assert_eq!(repo.find_by_email(&unknown).await.expect("lookup"), None);
    }
}
