//! Authentication commands such as registration details and login
//! credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, User, UserValidationError};

/// Domain error returned when registration payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Name or email failed identity validation.
    #[error(transparent)]
    Identity(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated registration details consumed by the auth service.
///
/// ## Invariants
/// - `name` and `email` satisfy the identity invariants.
/// - `password` is non-empty and retains caller-provided whitespace to avoid
///   surprising credential comparisons.
#[derive(Debug, Clone)]
pub struct RegistrationDetails {
    name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl RegistrationDetails {
    /// Construct registration details from raw inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let name = DisplayName::new(name.trim())?;
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        Ok(Self {
            name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Display name for the new account.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Login email address for the new account.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by the auth service.
///
/// The email is kept as a raw string: login performs an exact,
/// case-sensitive lookup, and a syntactically odd address simply fails to
/// match any stored user.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::LoginCredentials;
    ///
    /// let creds = LoginCredentials::try_from_parts("ada@example.com", "secret").unwrap();
    /// assert_eq!(creds.email(), "ada@example.com");
    /// ```
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string used for the credential lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Result of a successful registration or login: the public identity plus a
/// signed bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    /// The authenticated user, password hash excluded.
    pub user: User,
    /// Signed session token proving the identity for a limited window.
    pub token: String,
}
