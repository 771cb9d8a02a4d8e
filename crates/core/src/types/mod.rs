//! Core types for the Noble Paints site.

pub mod category;
pub mod id;
pub mod locale;
pub mod pagination;

pub use category::CategoryRecord;
pub use id::*;
pub use locale::{Locale, LocaleError};
pub use pagination::{Pagination, parse_page};
