//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain expects to interact with storage
//! adapters; driving ports are the use-case surface consumed by inbound
//! adapters. Each driven port exposes strongly typed errors so adapters map
//! their failures into predictable variants instead of returning
//! `anyhow::Result`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::auth::{AuthenticatedIdentity, LoginCredentials, RegistrationDetails};
use super::complaint::{
    Complaint, ComplaintDraft, ComplaintId, ComplaintPatch, ComplaintWithOwner,
};
use super::error::Error;
use super::user::{User, UserId};

/// Persistence errors raised by [`UserRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// The email address is already registered.
    #[error("email is already registered: {email}")]
    DuplicateEmail { email: String },
}

impl UserPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for unique-email violations.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Persistence errors raised by [`ComplaintRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComplaintPersistenceError {
    /// Repository connection could not be established.
    #[error("complaint repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("complaint repository query failed: {message}")]
    Query { message: String },
}

impl ComplaintPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// A stored user together with its password hash.
///
/// Only the auth service sees this type; everything downstream of the access
/// guard works with [`User`], which has no hash.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// The stored identity.
    pub user: User,
    /// Argon2 PHC hash string of the password.
    pub password_hash: String,
}

/// Driven port for the credential store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user with its password hash.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email is
    /// already taken.
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError>;

    /// Look up a user by exact, case-sensitive email.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, UserPersistenceError>;

    /// Look up a user by id, password hash excluded.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}

/// Driven port for the ticket store.
///
/// All read operations return complaints joined with their owner's contact
/// details; inbound adapters decide whether the contact is exposed.
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Persist a newly filed complaint.
    async fn insert(&self, complaint: &Complaint) -> Result<(), ComplaintPersistenceError>;

    /// Fetch a complaint by id.
    async fn find_by_id(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintPersistenceError>;

    /// List every complaint, newest first.
    async fn list_all(&self) -> Result<Vec<ComplaintWithOwner>, ComplaintPersistenceError>;

    /// List the complaints owned by `owner_id`, newest first.
    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<ComplaintWithOwner>, ComplaintPersistenceError>;

    /// Apply a patch to a complaint, returning the updated record or `None`
    /// when the id is unknown.
    async fn update(
        &self,
        id: &ComplaintId,
        patch: &ComplaintPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintPersistenceError>;

    /// Permanently remove a complaint, returning whether a record existed.
    async fn delete(&self, id: &ComplaintId) -> Result<bool, ComplaintPersistenceError>;
}

/// Driving port: account registration, login, and bearer-token resolution.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a new account and issue a session token.
    async fn register(
        &self,
        details: &RegistrationDetails,
    ) -> Result<AuthenticatedIdentity, Error>;

    /// Authenticate stored credentials and issue a session token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedIdentity, Error>;

    /// Verify a bearer token and load the identity it belongs to.
    async fn resolve_bearer(&self, token: &str) -> Result<User, Error>;
}

/// Driving port: role-scoped complaint reads.
#[async_trait]
pub trait ComplaintsQuery: Send + Sync {
    /// List complaints visible to `caller`: everything for admins, own
    /// complaints otherwise.
    async fn list(&self, caller: &User) -> Result<Vec<ComplaintWithOwner>, Error>;

    /// Fetch a single complaint; only its owner or an admin may see it.
    async fn get(&self, caller: &User, id: &ComplaintId) -> Result<ComplaintWithOwner, Error>;
}

/// Driving port: complaint mutations.
#[async_trait]
pub trait ComplaintsCommand: Send + Sync {
    /// File a new complaint owned by `caller`.
    async fn create(&self, caller: &User, draft: &ComplaintDraft) -> Result<Complaint, Error>;

    /// Apply an admin patch to a complaint.
    async fn update(
        &self,
        caller: &User,
        id: &ComplaintId,
        patch: &ComplaintPatch,
    ) -> Result<ComplaintWithOwner, Error>;

    /// Permanently delete a complaint, returning its id.
    async fn delete(&self, caller: &User, id: &ComplaintId) -> Result<ComplaintId, Error>;
}
