//! Account service implementing the [`AuthService`] driving port.
//!
//! Registration hashes passwords with Argon2id before they reach the store;
//! login deliberately reports the same "wrong credentials" failure whether
//! the email is unknown or the password mismatches.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::auth::{AuthenticatedIdentity, LoginCredentials, RegistrationDetails};
use super::error::Error;
use super::password::{self, PasswordError};
use super::ports::{AuthService, UserPersistenceError, UserRepository};
use super::token::{TokenCodec, TokenError};
use super::user::{Role, User, UserId};

/// Account service backed by a credential store and a token codec.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: TokenCodec,
}

impl AccountService {
    /// Create a new service with the given repository and token codec.
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenCodec) -> Self {
        Self { users, tokens }
    }

    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("credential store unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("credential store error: {message}"))
            }
            UserPersistenceError::DuplicateEmail { .. } => {
                Error::conflict("email is already registered")
            }
        }
    }

    fn map_password_error(error: PasswordError) -> Error {
        Error::internal(format!("password hashing failed: {error}"))
    }

    fn map_token_error(error: TokenError) -> Error {
        match error {
            TokenError::Expired | TokenError::Invalid => Error::unauthorized("not authorized"),
            TokenError::Signing { message } => {
                Error::internal(format!("token signing failed: {message}"))
            }
        }
    }

    fn issue_identity(&self, user: User) -> Result<AuthenticatedIdentity, Error> {
        let token = self
            .tokens
            .issue(user.id(), Utc::now())
            .map_err(Self::map_token_error)?;
        Ok(AuthenticatedIdentity { user, token })
    }
}

#[async_trait]
impl AuthService for AccountService {
    async fn register(
        &self,
        details: &RegistrationDetails,
    ) -> Result<AuthenticatedIdentity, Error> {
        let existing = self
            .users
            .find_by_email(details.email().as_str())
            .await
            .map_err(Self::map_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict("email is already registered"));
        }

        let password_hash =
            password::hash(details.password()).map_err(Self::map_password_error)?;
        let user = User::new(
            UserId::random(),
            details.name().clone(),
            details.email().clone(),
            Role::User,
        );

        // A concurrent registration can still win the race between the
        // lookup above and this insert; the store's unique index settles it.
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(Self::map_persistence_error)?;

        debug!(user_id = %user.id(), "registered new account");
        self.issue_identity(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedIdentity, Error> {
        let record = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_persistence_error)?;

        // Unknown email and wrong password must be indistinguishable.
        let Some(record) = record else {
            return Err(Error::unauthorized("wrong credentials"));
        };
        let matches = password::verify(&record.password_hash, credentials.password())
            .map_err(|err| Error::internal(format!("password verification failed: {err}")))?;
        if !matches {
            return Err(Error::unauthorized("wrong credentials"));
        }

        self.issue_identity(record.user)
    }

    async fn resolve_bearer(&self, token: &str) -> Result<User, Error> {
        let user_id = self.tokens.verify(token).map_err(Self::map_token_error)?;
        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(Self::map_persistence_error)?;
        // A valid signature for a vanished user still fails closed.
        user.ok_or_else(|| Error::unauthorized("not authorized"))
    }
}
