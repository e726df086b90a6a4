//! Declarative validation for registration input.
//!
//! Rules are a static, ordered table of `(field, check, message)` records.
//! Every rule runs; failures are collected in declaration order so clients
//! always see the same message list for the same input.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, Password, PersonName, UserValidationError};

/// Fields accepted by `POST /api/users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationField {
    FirstName,
    LastName,
    EmailAddress,
    Password,
}

impl RegistrationField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::EmailAddress => "emailAddress",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untrusted registration input.
///
/// `None` stands for a value that was absent, null or falsy at the edge.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<Zeroizing<String>>,
}

impl RegistrationInput {
    fn value(&self, field: RegistrationField) -> Option<&str> {
        match field {
            RegistrationField::FirstName => self.first_name.as_deref(),
            RegistrationField::LastName => self.last_name.as_deref(),
            RegistrationField::EmailAddress => self.email_address.as_deref(),
            RegistrationField::Password => self.password.as_ref().map(|value| value.as_str()),
        }
    }
}

impl fmt::Debug for RegistrationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_address", &self.email_address)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

struct FieldRule {
    field: RegistrationField,
    check: fn(Option<&str>) -> bool,
    message: &'static str,
}

fn exists(value: Option<&str>) -> bool {
    value.is_some_and(|raw| !raw.is_empty())
}

fn is_email(value: Option<&str>) -> bool {
    value.is_some_and(EmailAddress::is_valid)
}

const RULES: [FieldRule; 5] = [
    FieldRule {
        field: RegistrationField::FirstName,
        check: exists,
        message: r#"Please provide a value for "first name""#,
    },
    FieldRule {
        field: RegistrationField::LastName,
        check: exists,
        message: r#"Please provide a value for "last name""#,
    },
    FieldRule {
        field: RegistrationField::EmailAddress,
        check: exists,
        message: r#"Please provide a value for "email""#,
    },
    FieldRule {
        field: RegistrationField::EmailAddress,
        check: is_email,
        message: "Please provide a valid email address",
    },
    FieldRule {
        field: RegistrationField::Password,
        check: exists,
        message: r#"Please provide a value for "password""#,
    },
];

/// Ordered, non-empty list of validation messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    /// Borrow the messages.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// Take ownership of the messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Registration input that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email_address: EmailAddress,
    pub password: Password,
}

impl TryFrom<RegistrationInput> for ValidRegistration {
    type Error = UserValidationError;

    fn try_from(input: RegistrationInput) -> Result<Self, Self::Error> {
        let RegistrationInput {
            first_name,
            last_name,
            email_address,
            password,
        } = input;
        Ok(Self {
            first_name: PersonName::new(first_name.unwrap_or_default())?,
            last_name: PersonName::new(last_name.unwrap_or_default())?,
            email_address: EmailAddress::new(email_address.unwrap_or_default())?,
            password: Password::new(
                password
                    .as_ref()
                    .map(|value| value.as_str())
                    .unwrap_or_default(),
            )?,
        })
    }
}

/// Run every rule against the input.
///
/// # Examples
/// ```
/// use userbase::domain::{RegistrationInput, validate_registration};
///
/// let input = RegistrationInput {
///     first_name: None,
///     last_name: Some("Doe".into()),
///     email_address: Some("bad-email".into()),
///     password: Some("secret1".to_owned().into()),
/// };
/// let errors = validate_registration(input).expect_err("two rules fail");
/// assert_eq!(
///     errors.messages(),
///     [
///         r#"Please provide a value for "first name""#,
///         "Please provide a valid email address",
///     ]
/// );
/// ```
pub fn validate_registration(
    input: RegistrationInput,
) -> Result<ValidRegistration, ValidationErrors> {
    let messages: Vec<String> = RULES
        .iter()
        .filter(|rule| !(rule.check)(input.value(rule.field)))
        .map(|rule| rule.message.to_owned())
        .collect();
    if !messages.is_empty() {
        return Err(ValidationErrors(messages));
    }

    ValidRegistration::try_from(input).map_err(|error| ValidationErrors(vec![error.to_string()]))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for rule ordering and collect-all semantics.
    use super::*;
    use rstest::{fixture, rstest};

    const FIRST_NAME: &str = r#"Please provide a value for "first name""#;
    const LAST_NAME: &str = r#"Please provide a value for "last name""#;
    const EMAIL: &str = r#"Please provide a value for "email""#;
    const EMAIL_FORMAT: &str = "Please provide a valid email address";
    const PASSWORD: &str = r#"Please provide a value for "password""#;

    #[fixture]
    fn valid_input() -> RegistrationInput {
        RegistrationInput {
            first_name: Some("Jane".to_owned()),
            last_name: Some("Doe".to_owned()),
            email_address: Some("jane@example.com".to_owned()),
            password: Some(Zeroizing::new("secret1".to_owned())),
        }
    }

    fn messages(input: RegistrationInput) -> Vec<String> {
        validate_registration(input)
            .expect_err("validation should fail")
            .into_messages()
    }

    #[rstest]
    fn valid_input_produces_typed_values(valid_input: RegistrationInput) {
        let valid = validate_registration(valid_input).expect("valid input");
        assert_eq!(valid.first_name.as_str(), "Jane");
        assert_eq!(valid.last_name.as_str(), "Doe");
        assert_eq!(valid.email_address.as_str(), "jane@example.com");
        assert_eq!(valid.password.expose(), "secret1");
    }

    #[rstest]
    fn empty_input_reports_every_rule_in_declared_order() {
        assert_eq!(
            messages(RegistrationInput::default()),
            [FIRST_NAME, LAST_NAME, EMAIL, EMAIL_FORMAT, PASSWORD]
        );
    }

    #[rstest]
    fn empty_strings_count_as_missing(valid_input: RegistrationInput) {
        let input = RegistrationInput {
            first_name: Some(String::new()),
            last_name: Some(String::new()),
            ..valid_input
        };
        assert_eq!(messages(input), [FIRST_NAME, LAST_NAME]);
    }

    #[rstest]
    fn mixed_failures_skip_passing_fields() {
        let input = RegistrationInput {
            first_name: Some(String::new()),
            last_name: Some("Doe".to_owned()),
            email_address: Some("bad-email".to_owned()),
            password: Some(Zeroizing::new(String::new())),
        };
        assert_eq!(messages(input), [FIRST_NAME, EMAIL_FORMAT, PASSWORD]);
    }

    #[rstest]
    #[case(RegistrationField::FirstName, FIRST_NAME)]
    #[case(RegistrationField::LastName, LAST_NAME)]
    #[case(RegistrationField::Password, PASSWORD)]
    fn single_missing_field_yields_single_message(
        valid_input: RegistrationInput,
        #[case] field: RegistrationField,
        #[case] expected: &str,
    ) {
        let mut input = valid_input;
        match field {
            RegistrationField::FirstName => input.first_name = None,
            RegistrationField::LastName => input.last_name = None,
            RegistrationField::EmailAddress => input.email_address = None,
            RegistrationField::Password => input.password = None,
        }
        assert_eq!(messages(input), [expected]);
    }

    #[rstest]
    fn missing_email_reports_presence_and_format(valid_input: RegistrationInput) {
        let input = RegistrationInput {
            email_address: None,
            ..valid_input
        };
        assert_eq!(messages(input), [EMAIL, EMAIL_FORMAT]);
    }

    #[rstest]
    fn invalid_email_alone_is_reported(valid_input: RegistrationInput) {
        let input = RegistrationInput {
            email_address: Some("jane@".to_owned()),
            ..valid_input
        };
        assert_eq!(messages(input), [EMAIL_FORMAT]);
    }

    #[rstest]
    #[case("josé@example.com")]
    #[case("jane@münchen.de")]
    #[case("jane@example.xn--p1ai")]
    #[case(r#""jane doe"@example.com"#)]
    fn international_and_quoted_addresses_pass(
        valid_input: RegistrationInput,
        #[case] email: &str,
    ) {
        let input = RegistrationInput {
            email_address: Some(email.to_owned()),
            ..valid_input
        };
        let valid = validate_registration(input).expect("address should be accepted");
        assert_eq!(valid.email_address.as_str(), email);
    }

    #[rstest]
    fn debug_output_hides_password(valid_input: RegistrationInput) {
        assert!(!format!("{valid_input:?}").contains("secret1"));
    }

    #[rstest]
    fn field_wire_names_are_camel_case() {
        assert_eq!(RegistrationField::EmailAddress.to_string(), "emailAddress");
    }
}
