//! Authentication service.
//!
//! Username and password sign-in for control panel accounts, backed by
//! argon2 hashes.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::AdminBootstrapConfig;
use crate::db::RepositoryError;
use crate::db::admin_users::{AdminUserRepository, NewAdminUser};
use crate::models::AdminUser;

/// Minimum password length for accounts created or changed by an operator.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Password given to the bootstrap admin when none is configured.
const FALLBACK_ADMIN_PASSWORD: &str = "ChangeMe123!";

/// What [`AuthService::ensure_default_admin`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The account was created. `fallback_password` is set when no password
    /// was configured.
    Created { fallback_password: bool },
    /// The account existed but its password no longer matched; it was reset.
    PasswordReset,
    /// The account existed with the configured password.
    Unchanged,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
        }
    }

    /// Sign in with a username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown username, an
    /// inactive account, or a wrong password.
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminUser, AuthError> {
        let username = normalize_username(username);
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !user.is_active {
            tracing::warn!(username = %user.username, "Sign-in attempt for inactive admin");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Create a control panel account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn create_admin(
        &self,
        username: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<AdminUser, AuthError> {
        validate_password(password)?;
        self.insert_admin(username, password, full_name).await
    }

    /// Change the password of an existing account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account has this username.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    pub async fn set_password(&self, username: &str, password: &str) -> Result<(), AuthError> {
        validate_password(password)?;
        let user = self
            .users
            .get_by_username(&normalize_username(username))
            .await?
            .ok_or(AuthError::UserNotFound)?;
        let password_hash = hash_password(password)?;
        self.users.set_password_hash(user.id, &password_hash).await?;
        Ok(())
    }

    /// Make sure the configured bootstrap account exists and accepts the
    /// configured password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if a query fails.
    pub async fn ensure_default_admin(
        &self,
        config: &AdminBootstrapConfig,
    ) -> Result<BootstrapOutcome, AuthError> {
        let configured = config.password.as_ref().map(|p| p.expose_secret());
        let password = configured.unwrap_or(FALLBACK_ADMIN_PASSWORD);
        let username = normalize_username(&config.username);

        let Some((user, password_hash)) = self.users.get_with_password_hash(&username).await? else {
            self.insert_admin(&username, password, Some("Administrator"))
                .await?;
            return Ok(BootstrapOutcome::Created {
                fallback_password: configured.is_none(),
            });
        };

        if configured.is_none() || verify_password(password, &password_hash).is_ok() {
            return Ok(BootstrapOutcome::Unchanged);
        }

        let password_hash = hash_password(password)?;
        self.users.set_password_hash(user.id, &password_hash).await?;
        Ok(BootstrapOutcome::PasswordReset)
    }

    async fn insert_admin(
        &self,
        username: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<AdminUser, AuthError> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        let password_hash = hash_password(password)?;

        self.users
            .create(&NewAdminUser {
                username: &username,
                password_hash: &password_hash,
                full_name,
                email: None,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }
}

/// Usernames are matched trimmed and case-insensitively.
#[must_use]
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  Admin "), "admin");
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password(FALLBACK_ADMIN_PASSWORD).is_ok());
    }
}
