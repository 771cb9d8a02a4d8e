//! Domain models for the site.

pub mod admin_user;
pub mod content;
pub mod session;

pub use admin_user::AdminUser;
pub use content::{
    Approval, Catalog, Category, Certificate, Datasheet, Post, Product, SocialLink, Upload,
};
pub use session::{CurrentAdmin, keys as session_keys};
