//! Control panel account.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use noble_paints_core::AdminUserId;

/// A control panel user. The password hash never leaves the repository.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl AdminUser {
    /// Name shown in the control panel header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}
