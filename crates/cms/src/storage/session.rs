//! Storage scoped to a single context.

use std::sync::Arc;

use super::{MemoryBackend, StorageBackend, StorageError};

/// Per-context storage that lives as long as the context does.
///
/// Clones share the same entries, which is how a reload within one tab
/// keeps its session; separate `SessionStorage::new()` values never see each
/// other's data, which is how a second tab starts logged out.
#[derive(Debug, Clone, Default)]
pub struct SessionStorage {
    backend: Arc<MemoryBackend>,
}

impl SessionStorage {
    /// Fresh, empty session storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.get_item(key)
    }

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.set_item(key, value)
    }

    /// Remove `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove_item(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let tab = SessionStorage::new();
        let reloaded = tab.clone();
        tab.set_item("flag", "true").unwrap();
        assert_eq!(reloaded.get_item("flag").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_separate_sessions_are_isolated() {
        let tab_a = SessionStorage::new();
        let tab_b = SessionStorage::new();
        tab_a.set_item("flag", "true").unwrap();
        assert_eq!(tab_b.get_item("flag").unwrap(), None);
    }
}
