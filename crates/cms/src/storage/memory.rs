//! In-process storage backend.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{StorageBackend, StorageError};

/// A map held in memory, optionally capped in total size.
///
/// The cap counts key and value bytes across all entries, the way browsers
/// cap an origin's local storage.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    /// An unbounded backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend rejecting writes that would grow it past `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(bytes),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get_item("k").unwrap(), None);

        backend.set_item("k", "v").unwrap();
        assert_eq!(backend.get_item("k").unwrap().as_deref(), Some("v"));

        backend.remove_item("k").unwrap();
        assert_eq!(backend.get_item("k").unwrap(), None);
        backend.remove_item("k").unwrap();
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let backend = MemoryBackend::with_quota(10);
        backend.set_item("k", "12345").unwrap();

        let err = backend.set_item("k", "1234567890").unwrap_err();
        assert_eq!(
            err,
            StorageError::QuotaExceeded {
                needed: 11,
                limit: 10
            }
        );
        assert_eq!(backend.get_item("k").unwrap().as_deref(), Some("12345"));
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let backend = MemoryBackend::with_quota(6);
        backend.set_item("k", "abcde").unwrap();
        backend.set_item("k", "vwxyz").unwrap();
        assert_eq!(backend.get_item("k").unwrap().as_deref(), Some("vwxyz"));
        assert!(backend.set_item("j", "").is_err());
    }
}
