//! Password hashing helpers.
//!
//! Wraps Argon2id so the rest of the domain deals only in opaque PHC hash
//! strings. Verification distinguishes "wrong password" (a normal outcome)
//! from "the stored hash is unusable" (an internal fault).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

/// Failures raised while hashing or verifying passwords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Hashing the supplied password failed.
    #[error("failed to hash password: {message}")]
    Hash { message: String },
    /// The stored hash could not be parsed as a PHC string.
    #[error("stored password hash is malformed: {message}")]
    Malformed { message: String },
}

/// Hash a plaintext password with Argon2id and a fresh random salt.
pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordError::Hash {
            message: err.to_string(),
        })
}

/// Verify a candidate password against a stored PHC hash string.
///
/// Returns `Ok(false)` on a mismatch; only a corrupt or unsupported stored
/// hash is an error.
pub fn verify(stored: &str, candidate: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|err| PasswordError::Malformed {
        message: err.to_string(),
    })?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordError::Malformed {
            message: err.to_string(),
        }),
    }
}
