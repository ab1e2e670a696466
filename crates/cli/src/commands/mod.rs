//! Command implementations.
//!
//! Every command opens its own context on the file-backed storage in
//! `SiteConfig::data_dir`, the same way a browser tab opens one on the
//! site's storage.

pub mod auth;
pub mod books;
pub mod content;
pub mod image;
pub mod theme;

use std::sync::Arc;

use soft_stories_cms::auth::{AuthError, NoopProvider};
use soft_stories_cms::gateway::GatewayError;
use soft_stories_cms::media::MediaError;
use soft_stories_cms::storage::{FileBackend, OriginStorage};
use soft_stories_cms::store::Persistence;
use soft_stories_cms::{CmsError, SiteConfig, SiteContext};
use soft_stories_core::{MigrationError, SiteContent};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The site library reported an error.
    #[error(transparent)]
    Cms(#[from] CmsError),

    /// A file could not be read or written.
    #[error("{action} {path}: {source}")]
    File {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Arguments that clap cannot validate on its own.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CommandError {
    pub fn file(action: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        Self::File {
            action,
            path: path.display().to_string(),
            source,
        }
    }
}

macro_rules! via_cms_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for CommandError {
                fn from(e: $ty) -> Self {
                    Self::Cms(e.into())
                }
            }
        )*
    };
}

via_cms_error!(AuthError, GatewayError, MediaError, MigrationError);

/// Open a context on the configured storage directory.
pub fn open(config: &SiteConfig) -> SiteContext {
    tracing::debug!(dir = %config.data_dir.display(), "Opening file storage");
    let origin = OriginStorage::new(FileBackend::new(&config.data_dir));
    SiteContext::open(&origin, config, NoopProvider)
}

/// The loaded content of `ctx`.
///
/// Opening a context always completes the first load, so this never sees
/// the loading state.
pub fn loaded_content(ctx: &SiteContext) -> Arc<SiteContent> {
    ctx.store()
        .read()
        .loaded()
        .unwrap_or_else(|| Arc::new(SiteContent::default()))
}

/// Turn a diverged write into an error for the command.
pub fn ensure_persisted(persistence: Persistence) -> Result<(), CommandError> {
    match persistence {
        Persistence::Persisted => Ok(()),
        Persistence::Diverged(e) => Err(CmsError::from(e).into()),
    }
}
