//! Noble Paints site library.
//!
//! The public bilingual website and the control panel share one binary;
//! this crate exposes them as a library so the CLI and tests can reuse
//! the database layer and services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
