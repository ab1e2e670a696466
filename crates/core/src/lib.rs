//! Soft Stories Core - Content model types.
//!
//! This crate provides the types shared by every Soft Stories component:
//! - `cms` - Content store, update gateway and admin session gate
//! - `cli` - Command-line tools for inspecting and editing stored content
//!
//! # Architecture
//!
//! The core crate contains only types and pure transformations - no storage,
//! no environment access, no clocks beyond building the default content.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for book ids, prices and emails
//! - [`content`] - The `SiteContent` aggregate, its defaults and schema migration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod content;
pub mod types;

pub use content::*;
pub use types::*;
