//! Stateless bearer-token codec.
//!
//! Tokens are HS256 JWTs carrying only the user id as subject plus
//! issued-at/expiry timestamps. Validity is fully determined by signature
//! and expiry; no server-side session state exists.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::user::UserId;

/// Token lifetime: five days, matching the session window users expect.
pub const TOKEN_TTL_SECS: i64 = 5 * 24 * 60 * 60;

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user id.
    sub: String,
    /// Issued-at, seconds since the epoch.
    iat: i64,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

/// Failures raised while issuing or verifying tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token's expiry timestamp has passed.
    #[error("token has expired")]
    Expired,
    /// The token is missing, malformed, tampered with, or signed with a
    /// different key.
    #[error("token is invalid")]
    Invalid,
    /// Signing failed; indicates a broken key configuration.
    #[error("failed to sign token: {message}")]
    Signing { message: String },
}

/// Issues and verifies signed session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    /// Build a codec from a shared HMAC secret.
    #[must_use]
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for `user_id`, valid for [`TOKEN_TTL_SECS`] from
    /// `issued_at`.
    pub fn issue(&self, user_id: &UserId, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|err| TokenError::Signing {
            message: err.to_string(),
        })
    }

    /// Verify a token and return the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data =
            decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|err| {
                match err.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;
        data.claims.sub.parse().map_err(|_| TokenError::Invalid)
    }
}
