//! Embedded Diesel migrations for the shipments schema.
//!
//! Migrations run over a synchronous `PgConnection`, so the async entry point
//! moves the work onto a blocking thread.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Embedded migrations from the backend/migrations directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection could not be opened.
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    /// The blocking task running migrations panicked or was cancelled.
    #[error("migration task failed: {message}")]
    Task { message: String },
}

/// Apply all pending migrations, returning the versions that ran.
///
/// # Errors
///
/// Returns [`MigrationError::Connection`] when the database is unreachable
/// and [`MigrationError::Apply`] when a migration fails.
pub fn run_pending_migrations(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| MigrationError::Connection {
        message: err.to_string(),
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(applied.into_iter().map(|version| version.to_string()).collect())
}

/// Apply pending migrations on a blocking thread.
///
/// # Errors
///
/// Propagates [`run_pending_migrations`] failures and reports a
/// [`MigrationError::Task`] if the blocking task does not complete.
pub async fn run_pending_migrations_blocking(database_url: String) -> Result<(), MigrationError> {
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .map_err(|err| MigrationError::Task {
            message: err.to_string(),
        })??;

    if applied.is_empty() {
        info!("database schema up to date");
    } else {
        info!(versions = ?applied, "applied database migrations");
    }
    Ok(())
}
