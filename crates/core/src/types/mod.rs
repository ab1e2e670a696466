//! Core types for Soft Stories.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::BookId;
pub use price::{Price, PriceError};
