//! JSON file store for native builds

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ScoreStore, StoreError};

/// On-disk layout
#[derive(Debug, Serialize, Deserialize)]
struct BestRecord {
    best: u32,
}

/// Best score kept in a small JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `best.json` under the user's local data dir, or the working dir
    pub fn default_location() -> Self {
        let path = directories::ProjectDirs::from("", "", "tap-rush")
            .map(|dirs| dirs.data_local_dir().join("best.json"))
            .unwrap_or_else(|| PathBuf::from("tap_rush_best.json"));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Result<u32, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: BestRecord = serde_json::from_slice(&bytes)?;
        Ok(record.best)
    }

    fn save(&self, best: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec(&BestRecord { best })?;

        // Write aside then swap in, so a crash never leaves a half-written file
        let tmp = self.tmp_path();
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Best score {} written to {}", best, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_zero() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("best.json"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("deep").join("best.json"));
        store.save(17).unwrap();
        assert_eq!(store.load().unwrap(), 17);

        // A fresh store over the same file sees the value (next process start)
        let reopened = FileStore::new(store.path());
        assert_eq!(reopened.load().unwrap(), 17);
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("best.json");
        fs::write(&path, b"best=12").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_save_into_unwritable_location_is_error() {
        let dir = tempdir().unwrap();
        // Parent "dir" is actually a file
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let store = FileStore::new(blocker.join("best.json"));
        assert!(matches!(store.save(3), Err(StoreError::Io(_))));
    }
}
