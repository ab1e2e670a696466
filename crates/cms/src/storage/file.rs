//! Directory-backed storage, one file per key.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{StorageBackend, StorageError};

/// Stores each key as `<dir>/<key>.json`.
///
/// Each write goes to its own uniquely named temporary file in the same
/// directory, which is then renamed over the target. Readers see either the
/// old or the new document, and concurrent writers never share a temporary
/// file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Use `dir` as the storage root. It is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage root.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(key: &str, err: &std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_owned(),
        message: err.to_string(),
    }
}

impl StorageBackend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, &e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(key, &e))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{key}."))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| io_error(key, &e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| io_error(key, &e))?;
        tmp.persist(&path).map_err(|e| io_error(key, &e.error))?;

        tracing::debug!(key, path = %path.display(), bytes = value.len(), "Wrote storage file");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, &e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("data"));

        assert_eq!(backend.get_item("websiteData").unwrap(), None);
        backend.set_item("websiteData", "{\"a\":1}").unwrap();
        assert_eq!(
            backend.get_item("websiteData").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        let names: Vec<_> = std::fs::read_dir(dir.path().join("data"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["websiteData.json"]);
    }

    #[test]
    fn test_concurrent_writers_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let writers: Vec<_> = (0..4)
            .map(|writer| {
                let backend = FileBackend::new(dir.path());
                std::thread::spawn(move || {
                    (0..50)
                        .map(|i| backend.set_item("websiteData", &format!("{writer}-{i}")))
                        .filter(Result::is_err)
                        .count()
                })
            })
            .collect();

        let failures: usize = writers.into_iter().map(|w| w.join().unwrap()).sum();
        assert_eq!(failures, 0);

        let last = FileBackend::new(dir.path())
            .get_item("websiteData")
            .unwrap()
            .unwrap();
        assert!(last.ends_with("-49"));
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|entry| entry.as_ref().unwrap().file_name() != "websiteData.json")
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_second_backend_sees_write() {
        let dir = tempfile::tempdir().unwrap();
        FileBackend::new(dir.path()).set_item("k", "v").unwrap();
        let other = FileBackend::new(dir.path());
        assert_eq!(other.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        backend.remove_item("absent").unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        for key in ["", "../escape", ".hidden", "a/b"] {
            assert!(matches!(
                backend.set_item(key, "x"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }
}
