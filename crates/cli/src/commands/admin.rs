//! Control panel account commands.
//!
//! # Usage
//!
//! ```bash
//! np-cli admin create -u editor -p 'long-password' -n "Site Editor"
//! np-cli admin set-password -u editor -p 'new-long-password'
//! ```

use thiserror::Error;

use noble_paints_site::services::{AuthError, AuthService};

use super::{CommandError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    /// Username already taken.
    #[error("Admin user already exists: {0}")]
    UserExists(String),

    /// No account with this username.
    #[error("No admin user named {0}")]
    UnknownUser(String),

    #[error(transparent)]
    Auth(AuthError),
}

/// Create a new admin account.
///
/// # Returns
///
/// The ID of the created account.
///
/// # Errors
///
/// Returns an error if the username is taken or the password is too weak.
pub async fn create_user(
    username: &str,
    password: &str,
    name: Option<&str>,
) -> Result<i32, AdminError> {
    let pool = connect().await?;

    tracing::info!("Creating admin user: {}", username);
    let user = AuthService::new(&pool)
        .create_admin(username, password, name)
        .await
        .map_err(|e| match e {
            AuthError::UserAlreadyExists => AdminError::UserExists(username.to_owned()),
            other => AdminError::Auth(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );
    Ok(user.id.into())
}

/// Replace the password of an existing account.
///
/// # Errors
///
/// Returns an error if the account does not exist or the password is too
/// weak.
pub async fn set_password(username: &str, password: &str) -> Result<(), AdminError> {
    let pool = connect().await?;

    AuthService::new(&pool)
        .set_password(username, password)
        .await
        .map_err(|e| match e {
            AuthError::UserNotFound => AdminError::UnknownUser(username.to_owned()),
            other => AdminError::Auth(other),
        })?;

    tracing::info!("Password updated for {}", username);
    Ok(())
}
