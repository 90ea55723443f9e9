use sha2::Digest;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::backend::{StorageBackend, StorageError};

/// Directory-backed store that keeps one file per key.
///
/// ```text
/// <base_dir>/
/// └── <sha256(key)[..8] as hex>.json
/// ```
#[derive(Clone, Debug)]
pub struct FileBackend {
    base: PathBuf,
}

impl FileBackend {
    /// Open a backend rooted at `base`, creating the directory if needed
    pub fn new(base: impl Into<PathBuf>) -> io::Result<Self> {
        let base = base.into();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Map a storage key to a file path that is safe whatever the key contains
    pub fn path_for_key(&self, key: &str) -> PathBuf {
        let key_hash = sha2::Sha256::digest(key.as_bytes());
        self.base
            .join(format!("{}.json", hex::encode(&key_hash[..8])))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for_key(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for_key(key);

        // Write next to the target and rename so readers never see half a value
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for_key(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();

        let backend = FileBackend::new(dir.path()).unwrap();
        assert_eq!(backend.get("links-in-users").unwrap(), None);
        backend.set("links-in-users", "[]").unwrap();

        let reopened = FileBackend::new(dir.path()).unwrap();
        assert_eq!(
            reopened.get("links-in-users").unwrap(),
            Some("[]".to_string())
        );
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();

        assert!(backend.remove("never-written").is_ok());

        backend.set("key", "value").unwrap();
        backend.remove("key").unwrap();
        assert_eq!(backend.get("key").unwrap(), None);
    }

    #[test]
    fn test_unreadable_value_is_io_error() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();

        // A directory where the value file should be cannot be read as text
        fs::create_dir(backend.path_for_key("links-in-users")).unwrap();
        assert!(matches!(
            backend.get("links-in-users"),
            Err(StorageError::Io(_))
        ));
    }

    #[test]
    fn test_key_file_naming() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path().join("nested")).unwrap();
        assert!(backend.base_dir().is_dir());

        let path = backend.path_for_key("../../etc/passwd");
        assert_eq!(path.parent().unwrap(), backend.base_dir());

        let file_name = path.file_name().unwrap().to_str().unwrap();
        let hash_part = file_name.strip_suffix(".json").unwrap();
        assert_eq!(hash_part.len(), 16);
        assert!(hash_part.chars().all(|c| c.is_ascii_hexdigit()));

        // Distinct keys land in distinct files
        assert_ne!(
            backend.path_for_key("links-in-users"),
            backend.path_for_key("links-in-saved-links")
        );
    }

    #[test]
    fn test_availability_on_directory() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();
        assert!(backend.is_available());

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }
}
