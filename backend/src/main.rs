//! Backend entry-point: wires configuration, storage, and the HTTP server.

mod server;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{self, DbPool, PoolConfig};
use server::ServerConfig;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let mut config = ServerConfig::from_env()?;
    info!(fingerprint = %config.key_fingerprint(), "token signing key loaded");

    if let Some(url) = config.database_url().map(ToOwned::to_owned) {
        persistence::run_pending_migrations(&url).await?;
        let pool = DbPool::new(PoolConfig::new(url.as_str()))
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        config = config.with_db_pool(pool);
    } else {
        warn!("DATABASE_URL not set; serving from in-memory stores (dev only)");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, config)?;
    server.await
}
