//! Soft Stories CMS library.
//!
//! The site's content, its editing path and the admin login, as a library
//! each open context (tab) drives through a [`SiteContext`]:
//!
//! - [`store`] - In-memory content synchronised with durable storage and with
//!   other contexts
//! - [`gateway`] - Copy-on-write edits and book operations
//! - [`auth`] - Admin session gate checked against the configured identity
//! - [`routes`] - Route guard and page view helpers
//! - [`storage`] - Durable (shared) and session (per-context) key-value storage
//! - [`theme`] - Palette projection onto CSS variables
//! - [`media`] - Image embedding as `data:` URIs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod media;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
pub mod theme;

pub use config::SiteConfig;
pub use error::CmsError;
pub use state::{Resolution, SiteContext};
