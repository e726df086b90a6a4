//! User entity and the value types it is assembled from.
//!
//! Plaintext passwords only ever exist as [`Password`], which wipes its buffer
//! on drop. Stored users carry a [`PasswordDigest`] instead, and the only
//! client-facing projection is [`UserProfile`], which has no credential field
//! at all.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation errors raised by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyName,
    EmptyEmail,
    InvalidEmail,
    EmptyPassword,
    EmptyDigest,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyEmail => write!(f, "email address must not be empty"),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyDigest => write!(f, "password digest must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable, system-generated user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// First or last name. Any non-empty string is accepted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Construct a name, rejecting the empty string.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(name))
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const EMAIL_MAX: usize = 254;
const EMAIL_LOCAL_MAX: usize = 64;
const DOMAIN_LABEL_MAX: usize = 63;

// Non-ASCII ranges allowed in local parts and domain labels: the BMP from
// U+00A1 upwards, minus surrogates, U+FDD0..U+FDEF and U+FFF0..U+FFFF.
macro_rules! intl_chars {
    () => {
        r"\x{A1}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}"
    };
}

struct EmailPatterns {
    dot_atom_part: Regex,
    quoted_local: Regex,
    domain_label: Regex,
    tld: Regex,
}

static EMAIL_PATTERNS: OnceLock<EmailPatterns> = OnceLock::new();

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|error| panic!("email pattern failed to compile: {error}"))
}

fn email_patterns() -> &'static EmailPatterns {
    EMAIL_PATTERNS.get_or_init(|| EmailPatterns {
        dot_atom_part: compile(concat!(
            r"^[A-Za-z0-9!#$%&'*+\-/=?^_`{|}~",
            intl_chars!(),
            r"]+$"
        )),
        quoted_local: compile(concat!(
            r"^(?:[\s\x01-\x08\x0B\x0C\x0E-\x1F\x7F\x21\x23-\x5B\x5D-\x7E",
            intl_chars!(),
            r"]|\\[\x01-\x09\x0B\x0C\x0D-\x7F",
            intl_chars!(),
            r"])*$"
        )),
        domain_label: compile(r"^[A-Za-z0-9\x{A1}-\x{FFFF}-]+$"),
        tld: compile(concat!(
            r"^(?:[A-Za-z\x{A1}-\x{A8}\x{AA}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]{2,}",
            r"|xn[A-Za-z0-9-]{2,})$"
        )),
    })
}

/// Local part: either a quoted string or dot-separated atoms, where atoms may
/// carry non-ASCII letters.
fn is_valid_local_part(local: &str) -> bool {
    let patterns = email_patterns();
    if local.starts_with('"') {
        let mut inner = local.chars();
        inner.next();
        inner.next_back();
        return patterns.quoted_local.is_match(inner.as_str());
    }
    local
        .split('.')
        .all(|atom| patterns.dot_atom_part.is_match(atom))
}

/// Fully qualified domain name with an alphabetic or punycode TLD.
/// Internationalised labels are accepted as-is.
fn is_valid_domain(domain: &str) -> bool {
    let patterns = email_patterns();
    let labels: Vec<&str> = domain.split('.').collect();
    let Some(tld) = labels.last() else {
        return false;
    };
    if labels.len() < 2 || !patterns.tld.is_match(tld) {
        return false;
    }
    labels.iter().all(|label| {
        label.chars().count() <= DOMAIN_LABEL_MAX
            && patterns.domain_label.is_match(label)
            && !label.starts_with('-')
            && !label.ends_with('-')
            && !label.chars().any(|c| ('\u{FF01}'..='\u{FF5E}').contains(&c))
    })
}

/// Syntactically valid email address, unique across users at the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an email address.
    ///
    /// # Examples
    /// ```
    /// use userbase::domain::EmailAddress;
    ///
    /// assert!(EmailAddress::new("jane@example.com").is_ok());
    /// assert!(EmailAddress::new("bad-email").is_err());
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !Self::is_valid(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }

    /// Check email syntax without constructing a value.
    ///
    /// Accepts UTF-8 and quoted local parts and internationalised domains;
    /// rejects IP-literal domains, single-label domains and numeric TLDs.
    ///
    /// # Examples
    /// ```
    /// use userbase::domain::EmailAddress;
    ///
    /// assert!(EmailAddress::is_valid("josé@münchen.de"));
    /// assert!(EmailAddress::is_valid(r#""jane doe"@example.com"#));
    /// assert!(!EmailAddress::is_valid("jane@localhost"));
    /// ```
    #[must_use]
    pub fn is_valid(candidate: &str) -> bool {
        if candidate.chars().count() > EMAIL_MAX {
            return false;
        }
        let Some((local, domain)) = candidate.rsplit_once('@') else {
            return false;
        };
        local.len() <= EMAIL_LOCAL_MAX
            && domain.len() <= EMAIL_MAX
            && is_valid_domain(domain)
            && is_valid_local_part(local)
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plaintext credential as submitted by a client.
///
/// The buffer is zeroed on drop and `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Construct a password, rejecting the empty string.
    pub fn new(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = Zeroizing::new(password.into());
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(password))
    }

    /// Expose the plaintext to a hashing adapter.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// One-way salted digest of a [`Password`].
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a digest produced by a hasher or read back from storage.
    pub fn new(digest: impl Into<String>) -> Result<Self, UserValidationError> {
        let digest = digest.into();
        if digest.is_empty() {
            return Err(UserValidationError::EmptyDigest);
        }
        Ok(Self(digest))
    }

    /// Borrow the encoded digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(***)")
    }
}

/// User record handed to persistence; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email_address: EmailAddress,
    pub password_digest: PasswordDigest,
}

/// Persisted user.
///
/// ## Invariants
/// - `password_digest` is a one-way digest, never the submitted plaintext.
/// - The type is deliberately not `Serialize`; clients see [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    first_name: PersonName,
    last_name: PersonName,
    email_address: EmailAddress,
    password_digest: PasswordDigest,
}

impl User {
    /// Combine a stored identifier with the record it was created from.
    #[must_use]
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        let NewUser {
            first_name,
            last_name,
            email_address,
            password_digest,
        } = new_user;
        Self {
            id,
            first_name,
            last_name,
            email_address,
            password_digest,
        }
    }

    /// Stable user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Login email address.
    #[must_use]
    pub fn email_address(&self) -> &EmailAddress {
        &self.email_address
    }

    /// Stored credential digest.
    #[must_use]
    pub fn password_digest(&self) -> &PasswordDigest {
        &self.password_digest
    }
}

/// Public view of a user returned by `GET /api/users`.
///
/// Exactly four fields are serialised: `firstName`, `lastName`,
/// `emailAddress` and `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct UserProfile {
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "jane@example.com")]
    pub email_address: String,
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            email_address: user.email_address.to_string(),
            id: user.id,
        }
    }
}
