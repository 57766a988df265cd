//! Best-score persistence
//!
//! Backends:
//! - `MemoryStore`: process-local, shared between clones
//! - `FileStore`: JSON file written via tmp file + rename (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm)
//!
//! Stores report failures; callers decide how to degrade.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Why a store couldn't load or save
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored best score is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored best score is corrupt: {0}")]
    Corrupt(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable home of the best score
pub trait ScoreStore {
    /// Persisted best, or 0 when nothing has been recorded yet
    fn load(&self) -> Result<u32, StoreError>;
    /// Persist a new best
    fn save(&self, best: u32) -> Result<(), StoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load(&self) -> Result<u32, StoreError> {
        (**self).load()
    }

    fn save(&self, best: u32) -> Result<(), StoreError> {
        (**self).save(best)
    }
}

/// Parse a best score kept as text
///
/// Accepts plain integers and the integral float forms `Number()` may write
/// (`"1e3"`, `"12.0"`). Fractional, negative or out-of-range values are corrupt.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn parse_stored_best(raw: &str) -> Result<u32, StoreError> {
    let raw = raw.trim();
    if let Ok(best) = raw.parse::<u32>() {
        return Ok(best);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => {
            Ok(v as u32)
        }
        _ => Err(StoreError::Corrupt(format!("unexpected value {:?}", raw))),
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    best: Option<u32>,
    saves: usize,
}

/// In-memory store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a best score
    pub fn with_best(best: u32) -> Self {
        let store = Self::new();
        store.lock().best = Some(best);
        store
    }

    /// Number of successful saves so far
    pub fn saves(&self) -> usize {
        self.lock().saves
    }

    /// Currently stored value, if any
    pub fn stored(&self) -> Option<u32> {
        self.lock().best
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, StoreError> {
        Ok(self.lock().best.unwrap_or(0))
    }

    fn save(&self, best: u32) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.best = Some(best);
        inner.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_empty_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), 0);
        assert_eq!(store.stored(), None);
    }

    #[test]
    fn test_memory_store_clones_share() {
        let store = MemoryStore::with_best(5);
        let other = store.clone();
        other.save(9).unwrap();
        assert_eq!(store.load().unwrap(), 9);
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn test_boxed_store() {
        let store: Box<dyn ScoreStore> = Box::new(MemoryStore::with_best(3));
        assert_eq!(store.load().unwrap(), 3);
    }

    #[test]
    fn test_parse_stored_best_integers() {
        assert_eq!(parse_stored_best("12").unwrap(), 12);
        assert_eq!(parse_stored_best(" 12 ").unwrap(), 12);
        assert_eq!(parse_stored_best("0").unwrap(), 0);
        assert_eq!(parse_stored_best("1e3").unwrap(), 1000);
        assert_eq!(parse_stored_best("12.0").unwrap(), 12);
    }

    #[test]
    fn test_parse_stored_best_rejects_garbage() {
        for raw in ["12.7", "-1", "NaN", "inf", "abc", "", "1e20"] {
            assert!(
                matches!(parse_stored_best(raw), Err(StoreError::Corrupt(_))),
                "{:?} should be corrupt",
                raw
            );
        }
    }
}
