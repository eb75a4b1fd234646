//! PostgreSQL persistence adapters built on Diesel.

mod diesel_complaint_repository;
mod diesel_user_repository;
pub(crate) mod models;
pub mod pool;
pub mod schema;

use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub use diesel_complaint_repository::DieselComplaintRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

/// SQL migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Run any pending migrations against `database_url`.
///
/// Uses a dedicated synchronous connection on a blocking thread; the async
/// pool is only constructed afterwards.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the connection cannot be established or a
/// migration fails to apply.
pub async fn run_pending_migrations(database_url: &str) -> std::io::Result<()> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = diesel::pg::PgConnection::establish(&database_url)
            .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|applied| {
                if !applied.is_empty() {
                    tracing::info!(count = applied.len(), "applied pending migrations");
                }
            })
            .map_err(|err| std::io::Error::other(format!("migration failed: {err}")))
    })
    .await
    .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
}
