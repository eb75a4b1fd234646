//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;

use backend::outbound::persistence::DbPool;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_KEY_FILE: &str = "/var/run/secrets/token_key";

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: Option<String>,
    pub(crate) token_secret: Zeroizing<Vec<u8>>,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Resolve configuration from the environment.
    ///
    /// Reads `BIND_ADDR`, `DATABASE_URL`, and `TOKEN_KEY_FILE`. Outside
    /// debug builds a missing token key file is fatal unless
    /// `TOKEN_ALLOW_EPHEMERAL=1` explicitly opts into a throwaway key.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

        let database_url = env::var("DATABASE_URL").ok();

        let key_path =
            env::var("TOKEN_KEY_FILE").unwrap_or_else(|_| DEFAULT_TOKEN_KEY_FILE.into());
        let token_secret = match std::fs::read(&key_path) {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(e) => {
                let allow_dev = env::var("TOKEN_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!(path = %key_path, error = %e, "using ephemeral token signing key (dev only)");
                    let mut buf = vec![0u8; 32];
                    rand::thread_rng().fill_bytes(&mut buf);
                    Zeroizing::new(buf)
                } else {
                    return Err(std::io::Error::other(format!(
                        "failed to read token key at {key_path}: {e}"
                    )));
                }
            }
        };

        Ok(Self {
            bind_addr,
            database_url,
            token_secret,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        })
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// Without a pool the server falls back to in-memory stores, which is
    /// only suitable for development.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Configured database URL, if any.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// SHA-256 fingerprint of the token signing key, for startup logs.
    ///
    /// Lets operators confirm which key is live without ever logging the
    /// key itself.
    #[must_use]
    pub fn key_fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.token_secret.as_slice()))
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn config_with_secret(secret: &[u8]) -> ServerConfig {
        ServerConfig {
            bind_addr: "127.0.0.1:0".parse().expect("valid addr"),
            database_url: None,
            token_secret: Zeroizing::new(secret.to_vec()),
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    #[test]
    fn fingerprint_is_stable_for_a_given_key() {
        let first = config_with_secret(b"secret").key_fingerprint();
        let second = config_with_secret(b"secret").key_fingerprint();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn fingerprint_differs_across_keys() {
        let first = config_with_secret(b"secret-a").key_fingerprint();
        let second = config_with_secret(b"secret-b").key_fingerprint();
        assert_ne!(first, second);
    }
}
