//! Database operations for the site `PostgreSQL`.
//!
//! ## Tables
//!
//! - `categories` - Product categories (served through the categories cache)
//! - `products`, `catalogs`, `technical_datasheets` - Localized content rows
//! - `posts` - News items with view counters
//! - `certificates`, `approvals` - Downloadable credentials
//! - `uploads` - Binary files (catalog PDFs, product datasheets)
//! - `social_links` - Footer social icons
//! - `admin_users` - Control panel accounts
//! - `tower_sessions.session` - Session storage (owned by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/site/migrations/` and run via:
//! ```bash
//! cargo run -p noble-paints-cli -- migrate
//! ```

pub mod admin_users;
pub mod categories;
pub mod content;
pub mod posts;
pub mod query;
pub mod uploads;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use categories::CategoryRepository;
pub use content::{
    ApprovalRepository, CatalogRepository, CertificateRepository, DatasheetRepository,
    ProductRepository, SocialLinkRepository,
};
pub use posts::PostRepository;
pub use query::{Listing, ListingOrder};
pub use uploads::UploadRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a `rows_affected` count of zero to `RepositoryError::NotFound`.
pub(crate) const fn require_affected(rows: u64) -> Result<(), RepositoryError> {
    if rows == 0 {
        Err(RepositoryError::NotFound)
    } else {
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
