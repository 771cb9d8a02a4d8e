//! Session-related types.
//!
//! Types stored in the session for authentication and locale state.

use serde::{Deserialize, Serialize};

use noble_paints_core::AdminUserId;

use super::AdminUser;

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Login name.
    pub username: String,
    /// Admin's display name.
    pub name: String,
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.display_name().to_owned(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the active display locale code.
    pub const LANG: &str = "lang";

    /// Key for a one-shot notice shown on the next rendered page.
    pub const FLASH: &str = "flash";
}
