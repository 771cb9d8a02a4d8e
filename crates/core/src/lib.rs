//! Noble Paints Core - Shared types library.
//!
//! This crate provides the types and selection policy used by:
//! - `site` - Public website and control panel
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Repositories in the site crate translate the
//! policy here into SQL.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, locales, pagination and category records
//! - [`selector`] - Listing filters and locale fallback

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod selector;
pub mod types;

pub use selector::{
    FilterClause, ListingFilter, LocaleScope, LocalizedContent, collect_fallback, is_sentinel,
    order_by_id_list,
};
pub use types::*;
