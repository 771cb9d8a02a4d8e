//! Database migration command.
//!
//! Applies the embedded site migrations (`crates/site/migrations/`), then
//! creates the `tower_sessions` table used by the session store.

use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use noble_paints_site::db::MIGRATOR;

use super::{CommandError, connect};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Session store migration error: {0}")]
    SessionStore(#[from] sqlx::Error),
}

/// Run every pending migration.
///
/// # Errors
///
/// Returns an error if connecting or any migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running site migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Creating session store table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
