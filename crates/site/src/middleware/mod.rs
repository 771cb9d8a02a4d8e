//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! The extractors here read the session installed by the session layer.

pub mod auth;
pub mod locale;
pub mod session;

pub use auth::{OptionalAdminAuth, RequireAdminAuth, clear_current_admin, set_current_admin};
pub use locale::{ActiveLocale, set_session_locale};
pub use session::{create_session_layer, set_flash, take_flash};
