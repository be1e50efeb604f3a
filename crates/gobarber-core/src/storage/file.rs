use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{SessionStore, StoreError};

/// Storage file name in the data directory
pub const STORAGE_FILE: &str = "storage.json";

/// Key/value store persisted as a single JSON object on disk.
///
/// Every write rewrites the whole file through a temporary file and a
/// rename, so a crash mid-write leaves the previous contents intact. An
/// unparsable file reads as an error but is replaced by the next write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by `storage.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Entries to rewrite, plus whether the file on disk was unparsable.
    fn read_for_write(&self) -> Result<(BTreeMap<String, String>, bool), StoreError> {
        match self.read_all() {
            Ok(entries) => Ok((entries, false)),
            Err(StoreError::Corrupt(e)) => {
                warn!(path = ?self.path, error = %e, "Storage file is corrupt, replacing it");
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let contents = serde_json::to_string_pretty(entries)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(io::Error::from)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let (mut entries, _) = self.read_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;
        debug!(key, path = ?self.path, "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let (mut entries, corrupt) = self.read_for_write()?;
        if entries.remove(key).is_some() || corrupt {
            self.write_all(&entries)?;
            debug!(key, path = ?self.path, "Removed value");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert_eq!(store.get("GoBarber:token").unwrap(), None);
        // Removing from a store that was never written must not create it
        store.remove("GoBarber:token").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("gobarber");

        FileStore::in_dir(&nested).set("GoBarber:token", "abc").unwrap();

        let reopened = FileStore::in_dir(&nested);
        assert_eq!(reopened.get("GoBarber:token").unwrap().as_deref(), Some("abc"));

        reopened.remove("GoBarber:token").unwrap();
        assert_eq!(FileStore::in_dir(&nested).get("GoBarber:token").unwrap(), None);
    }

    #[test]
    fn test_file_store_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_corrupt_file_is_an_error_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.get("a"), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_file_store_set_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "{trunc").unwrap();

        store.set("GoBarber:token", "abc").unwrap();
        assert_eq!(store.get("GoBarber:token").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_store_remove_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "{trunc").unwrap();

        store.remove("GoBarber:token").unwrap();
        assert_eq!(store.get("GoBarber:token").unwrap(), None);
        assert_ne!(std::fs::read_to_string(store.path()).unwrap(), "{trunc");
    }

    #[test]
    fn test_file_store_write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(STORAGE_FILE)]);
    }
}
