//! Business logic services for the site.
//!
//! # Services
//!
//! - `auth` - Username and password authentication for the control panel
//! - `email` - Contact form delivery via SMTP
//! - `translate` - Optional machine translation for category names

pub mod auth;
pub mod email;
pub mod translate;

pub use auth::{AuthError, AuthService, BootstrapOutcome};
pub use email::{ContactMessage, EmailError, EmailService};
pub use translate::{TranslateError, Translator};
