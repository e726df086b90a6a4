//! User registration workflow: validate, hash, persist, classify.
//!
//! Expected rejections (input rules, store constraints) come back as
//! [`RegistrationOutcome::Rejected`]; everything else is an [`Error`] for the
//! process-wide boundary.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::blocking::run_blocking;
use super::ports::{
    PasswordHasher, RegistrationOutcome, UserPersistenceError, UserRegistration, UserRepository,
    UserSeedStore,
};
use super::{Error, NewUser, RegistrationInput, ValidRegistration, validate_registration};

/// Upper bound on a single store call before the request is failed.
pub const DEFAULT_PERSISTENCE_TIMEOUT: Duration = Duration::from_secs(10);

/// Domain service implementing [`UserRegistration`].
#[derive(Clone)]
pub struct UserRegistrationService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    seed_store: Option<Arc<dyn UserSeedStore>>,
    persistence_timeout: Duration,
}

impl UserRegistrationService {
    /// Create a service over the given repository and hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users,
            hasher,
            seed_store: None,
            persistence_timeout: DEFAULT_PERSISTENCE_TIMEOUT,
        }
    }

    /// Mirror every created user into `store`.
    #[must_use]
    pub fn with_seed_store(mut self, store: Arc<dyn UserSeedStore>) -> Self {
        self.seed_store = Some(store);
        self
    }

    /// Override the store call timeout.
    #[must_use]
    pub fn with_persistence_timeout(mut self, timeout: Duration) -> Self {
        self.persistence_timeout = timeout;
        self
    }

    async fn hash_credentials(&self, valid: ValidRegistration) -> Result<NewUser, Error> {
        let ValidRegistration {
            first_name,
            last_name,
            email_address,
            password,
        } = valid;
        let hasher = Arc::clone(&self.hasher);
        let password_digest = run_blocking(move || hasher.hash(&password))
            .await?
            .map_err(|err| Error::internal(err.to_string()))?;

        Ok(NewUser {
            first_name,
            last_name,
            email_address,
            password_digest,
        })
    }
}

#[async_trait]
impl UserRegistration for UserRegistrationService {
    async fn register(&self, input: RegistrationInput) -> Result<RegistrationOutcome, Error> {
        let valid = match validate_registration(input) {
            Ok(valid) => valid,
            Err(errors) => {
                debug!(messages = ?errors.messages(), "registration input rejected");
                return Ok(RegistrationOutcome::Rejected(errors.into_messages()));
            }
        };

        let new_user = self.hash_credentials(valid).await?;

        let created = tokio::time::timeout(self.persistence_timeout, self.users.create(&new_user))
            .await
            .map_err(|_| {
                error!(
                    timeout_ms = self.persistence_timeout.as_millis(),
                    "user store did not answer in time"
                );
                Error::service_unavailable("user store did not respond in time")
            })?;

        match created {
            Ok(user) => {
                if let Some(store) = &self.seed_store {
                    store.record(&user);
                }
                info!(user_id = %user.id(), "user registered");
                Ok(RegistrationOutcome::Created(*user.id()))
            }
            Err(UserPersistenceError::ConstraintViolation { messages }) => {
                warn!(?messages, "user record rejected by store");
                Ok(RegistrationOutcome::Rejected(messages))
            }
            Err(other) => {
                error!(error = %other, "user store failed during registration");
                Err(other.into())
            }
        }
    }
}
