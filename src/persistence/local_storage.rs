//! Browser LocalStorage store
//!
//! The value is a bare integer string so scores recorded by the earlier web
//! build under the same key keep counting.

use web_sys::Storage;

use super::{ScoreStore, StoreError, parse_stored_best};
use crate::consts::BEST_SCORE_KEY;

#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        Self::with_key(BEST_SCORE_KEY)
    }

    pub fn with_key(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage() -> Result<Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage is not accessible".into()))
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<u32, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(&self.key) {
            Ok(Some(raw)) => parse_stored_best(&raw),
            Ok(None) => Ok(0),
            Err(e) => Err(StoreError::Unavailable(format!("{:?}", e))),
        }
    }

    fn save(&self, best: u32) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        storage
            .set_item(&self.key, &best.to_string())
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;
        log::info!("Best score saved ({})", best);
        Ok(())
    }
}
