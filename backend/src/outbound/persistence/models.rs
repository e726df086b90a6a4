//! Internal Diesel row structs for the `users` table.
//!
//! Rows never leave the persistence module; the repository converts them to
//! domain [`User`](crate::domain::User) values on the way out.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::users;
use crate::domain::{
    EmailAddress, NewUser, PasswordDigest, PersonName, User, UserId, UserValidationError,
};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password: String,
    #[expect(dead_code, reason = "audit column not surfaced by the domain")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column not surfaced by the domain")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email_address: &'a str,
    pub password: &'a str,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_domain(id: &UserId, user: &'a NewUser) -> Self {
        Self {
            id: *id.as_uuid(),
            first_name: user.first_name.as_str(),
            last_name: user.last_name.as_str(),
            email_address: user.email_address.as_str(),
            password: user.password_digest.as_str(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let new_user = NewUser {
            first_name: PersonName::new(row.first_name)?,
            last_name: PersonName::new(row.last_name)?,
            email_address: EmailAddress::new(row.email_address)?,
            password_digest: PasswordDigest::new(row.password)?,
        };
        Ok(User::from_new(UserId::from_uuid(row.id), new_user))
    }
}
