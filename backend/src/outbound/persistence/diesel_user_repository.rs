//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Constraint failures raised by PostgreSQL (the unique email index and the
//! non-empty `CHECK`s) are translated into client-safe messages so the
//! registration workflow can hand them straight back to the caller.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

pub(crate) const DUPLICATE_EMAIL_MESSAGE: &str =
    "An account with this email address already exists";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Message for a `CHECK` or `NOT NULL` failure, keyed by the offending column.
fn missing_value_message(constraint: Option<&str>, column: Option<&str>) -> String {
    let hint = column.or(constraint).unwrap_or_default();
    let label = if hint.contains("first_name") {
        "first name"
    } else if hint.contains("last_name") {
        "last name"
    } else if hint.contains("email") {
        "email"
    } else if hint.contains("password") {
        "password"
    } else {
        return "User record is missing a required value".to_owned();
    };
    format!(r#"Please provide a value for "{label}""#)
}

fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => {
                UserPersistenceError::constraint_violation(vec![DUPLICATE_EMAIL_MESSAGE.to_owned()])
            }
            DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                UserPersistenceError::constraint_violation(vec![missing_value_message(
                    info.constraint_name(),
                    info.column_name(),
                )])
            }
            DatabaseErrorKind::ClosedConnection => {
                UserPersistenceError::connection("database connection error")
            }
            _ => UserPersistenceError::query("database error"),
        },
        _ => UserPersistenceError::query("database error"),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row)
        .map_err(|err| UserPersistenceError::query(format!("corrupted user row: {err}")))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = UserId::random();

        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow::from_domain(&id, user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        users::table
            .filter(users::email_address.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }
}
