//! PostgreSQL-backed `UserRepository` implementation using Diesel.
//!
//! Implements the credential-store port. The unique index on `email` is the
//! authority on duplicate registrations; a violation surfaces as
//! [`UserPersistenceError::DuplicateEmail`] so the service can report a
//! conflict even when two registrations race.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{CredentialRecord, UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, EmailAddress, Role, User, UserId};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

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

/// Map pool errors to domain user persistence errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user persistence errors.
///
/// `email` provides context for unique-violation mapping on inserts.
fn map_diesel_error(error: diesel::result::Error, email: &str) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

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
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::duplicate_email(email)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain [`User`].
///
/// The CHECK constraints make invalid rows unreachable in practice; a row
/// that still fails domain validation is reported as a query error rather
/// than silently skipped.
fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    let name = DisplayName::new(row.name.clone())
        .map_err(|err| UserPersistenceError::query(format!("stored user is invalid: {err}")))?;
    let email = EmailAddress::new(row.email.clone())
        .map_err(|err| UserPersistenceError::query(format!("stored user is invalid: {err}")))?;
    let role = match row.role.as_str() {
        "admin" => Role::Admin,
        "user" => Role::User,
        other => {
            // Fail closed: an unrecognised role never grants privileges.
            warn!(value = other, user_id = %row.id, "unrecognised role value, defaulting to user");
            Role::User
        }
    };
    Ok(User::new(UserId::from_uuid(row.id), name, email, role))
}

fn row_to_credential_record(row: UserRow) -> Result<CredentialRecord, UserPersistenceError> {
    let user = row_to_user(&row)?;
    Ok(CredentialRecord {
        user,
        password_hash: row.password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_str(),
            email: user.email().as_str(),
            password_hash,
            role: user.role().as_str(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, user.email().as_str()))
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, email))?;

        row.map(row_to_credential_record).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, ""))?;

        row.as_ref().map(row_to_user).transpose()
    }
}
