//! Domain primitives, services and ports.
//!
//! Purpose: hold the user model, the registration and authentication
//! workflows, and the port traits adapters implement. Nothing here knows
//! about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserProfile and their value types.
//! - RegistrationInput + validate_registration: the input rule table.
//! - UserRegistrationService / CredentialAuthenticator: port implementations.

pub mod authentication;
pub(crate) mod blocking;
pub mod error;
pub mod ports;
pub mod registration;
pub mod registration_service;
pub mod trace_id;
pub mod user;

pub use self::authentication::{BasicCredentials, CredentialAuthenticator, CredentialsError};
pub use self::error::{Error, ErrorCode};
pub use self::registration::{
    RegistrationField, RegistrationInput, ValidRegistration, ValidationErrors,
    validate_registration,
};
pub use self::registration_service::{DEFAULT_PERSISTENCE_TIMEOUT, UserRegistrationService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUser, Password, PasswordDigest, PersonName, User, UserId, UserProfile,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use userbase::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("Access Denied"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
