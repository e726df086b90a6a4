//! Credential checks backing the current-user endpoint.
//!
//! Inbound adapters decode whatever scheme they speak into
//! [`BasicCredentials`]; the [`CredentialAuthenticator`] resolves them to a
//! stored [`User`] by email address and password digest.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, warn};
use zeroize::Zeroizing;

use super::blocking::run_blocking;
use super::ports::{Authenticator, PasswordHasher, UserRepository};
use super::{DEFAULT_PERSISTENCE_TIMEOUT, EmailAddress, Error, Password, PasswordDigest, User};

const ACCESS_DENIED: &str = "Access Denied";
const DECOY_PASSWORD: &str = "userbase-unknown-account";

/// Reasons raw credentials are refused before any lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Email and password pair presented by a caller.
///
/// # Examples
/// ```
/// use userbase::domain::BasicCredentials;
///
/// let creds = BasicCredentials::try_from_parts(" jane@example.com ", "secret1")
///     .expect("non-empty parts");
/// assert_eq!(creds.email(), "jane@example.com");
/// assert_eq!(creds.password(), "secret1");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl BasicCredentials {
    /// Build credentials from raw parts. The email is trimmed; the password
    /// is kept as given.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CredentialsError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// [`Authenticator`] that checks a password against the stored digest.
#[derive(Clone)]
pub struct CredentialAuthenticator {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    lookup_timeout: Duration,
    decoy_digest: Arc<OnceLock<PasswordDigest>>,
}

impl CredentialAuthenticator {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users,
            hasher,
            lookup_timeout: DEFAULT_PERSISTENCE_TIMEOUT,
            decoy_digest: Arc::new(OnceLock::new()),
        }
    }

    /// Override the store lookup timeout.
    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    async fn lookup(&self, email: &EmailAddress) -> Result<Option<User>, Error> {
        tokio::time::timeout(self.lookup_timeout, self.users.find_by_email(email))
            .await
            .map_err(|_| {
                error!(
                    timeout_ms = self.lookup_timeout.as_millis(),
                    "user store did not answer in time"
                );
                Error::service_unavailable("user store did not respond in time")
            })?
            .map_err(|err| {
                error!(error = %err, "user lookup failed during authentication");
                Error::from(err)
            })
    }

    /// Spend one verify on a digest no account owns, so an unknown email
    /// costs as much as a wrong password. The decoy is hashed on first use
    /// with the configured work factor.
    async fn verify_against_decoy(&self, password: Password) -> Result<(), Error> {
        let hasher = Arc::clone(&self.hasher);
        let decoy = Arc::clone(&self.decoy_digest);
        run_blocking(move || {
            let digest = match decoy.get() {
                Some(digest) => digest.clone(),
                None => {
                    let hashed = Password::new(DECOY_PASSWORD)
                        .map_err(|err| err.to_string())
                        .and_then(|secret| hasher.hash(&secret).map_err(|err| err.to_string()));
                    match hashed {
                        Ok(digest) => decoy.get_or_init(|| digest).clone(),
                        Err(reason) => {
                            warn!(%reason, "decoy digest unavailable");
                            return;
                        }
                    }
                }
            };
            if let Err(err) = hasher.verify(&password, &digest) {
                warn!(error = %err, "decoy verify failed");
            }
        })
        .await
    }
}

#[async_trait]
impl Authenticator for CredentialAuthenticator {
    async fn authenticate(&self, credentials: &BasicCredentials) -> Result<User, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            debug!("credentials carry a malformed email address");
            return Err(Error::unauthorized(ACCESS_DENIED));
        };
        let password =
            Password::new(credentials.password()).map_err(|_| Error::unauthorized(ACCESS_DENIED))?;

        let Some(user) = self.lookup(&email).await? else {
            self.verify_against_decoy(password).await?;
            warn!("authentication failed: unknown email");
            return Err(Error::unauthorized(ACCESS_DENIED));
        };

        let hasher = Arc::clone(&self.hasher);
        let digest = user.password_digest().clone();
        let matches = run_blocking(move || hasher.verify(&password, &digest))
            .await?
            .map_err(|err| {
                error!(user_id = %user.id(), error = %err, "stored digest unusable");
                Error::internal(err.to_string())
            })?;

        if matches {
            debug!(user_id = %user.id(), "user authenticated");
            Ok(user)
        } else {
            warn!(user_id = %user.id(), "authentication failed: password mismatch");
            Err(Error::unauthorized(ACCESS_DENIED))
        }
    }
}
