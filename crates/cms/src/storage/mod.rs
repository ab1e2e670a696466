//! Key-value storage for content and session state.
//!
//! Two scopes exist, mirroring what a browser gives a page:
//!
//! - [`OriginStorage`] is durable and shared by every context (tab) of the
//!   site. Each context writes through its own [`StorageArea`]; every write
//!   is published to the other contexts as a [`StorageEvent`].
//! - [`SessionStorage`] is private to one context and never broadcast.
//!
//! Both sit on a [`StorageBackend`]: [`MemoryBackend`] for tests and
//! embedded use, [`FileBackend`] for the CLI.

mod file;
mod memory;
mod origin;
mod session;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use origin::{ContextId, Notification, OriginStorage, StorageArea, StorageEvent, Subscription};
pub use session::SessionStorage;

/// Errors raised by storage backends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The write would exceed the backend's size limit.
    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },
    /// A value could not be serialised before writing.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The key cannot be stored by this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    /// The underlying medium failed.
    #[error("I/O error for key {key:?}: {message}")]
    Io { key: String, message: String },
}

/// A synchronous string key-value store.
///
/// Implementations use interior mutability; one backend is shared by every
/// context attached to an origin.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write is rejected or fails.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}
