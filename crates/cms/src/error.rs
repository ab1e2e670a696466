//! Unified error handling for the site.

use thiserror::Error;

use soft_stories_core::MigrationError;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::gateway::GatewayError;
use crate::media::MediaError;
use crate::storage::StorageError;

/// Site-level error type, recovered where it occurs and shown to the admin.
#[derive(Debug, Error)]
pub enum CmsError {
    /// Logging in failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A content edit could not be applied.
    #[error("Edit error: {0}")]
    Gateway(#[from] GatewayError),

    /// Reading or writing storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// An image could not be embedded.
    #[error("Image error: {0}")]
    Media(#[from] MediaError),

    /// A stored document could not be understood.
    #[error("Document error: {0}")]
    Migration(#[from] MigrationError),

    /// The environment is misconfigured.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl CmsError {
    /// Message for the admin. Storage and document details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(e) => e.user_message().to_string(),
            Self::Storage(StorageError::QuotaExceeded { .. }) => {
                "Changes could not be saved: browser storage is full. Try smaller images.".to_string()
            }
            Self::Storage(_) => {
                "Changes could not be saved. They will be lost when this page is closed.".to_string()
            }
            Self::Migration(MigrationError::UnsupportedVersion { .. }) => {
                "This content was saved by a newer version of the site and cannot be edited here."
                    .to_string()
            }
            Self::Gateway(GatewayError::ReadOnly) => {
                "The stored content cannot be edited by this version of the site. Nothing was saved."
                    .to_string()
            }
            Self::Migration(MigrationError::DuplicateBookId(id)) => {
                format!("The content lists the book \"{id}\" more than once. Remove the copy and try again.")
            }
            Self::Migration(_) => "The content document is not valid and was not loaded.".to_string(),
            Self::Gateway(GatewayError::NotLoaded) => "Content is still loading.".to_string(),
            Self::Gateway(e) => e.to_string(),
            Self::Media(_) => "Please choose a PNG, JPEG, GIF, WebP or SVG image.".to_string(),
            Self::Config(e) => e.to_string(),
        }
    }
}
