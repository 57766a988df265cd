//! Best score bookkeeping
//!
//! Loaded once when the engine is built, written only when a finished round
//! beats it. Store failures never reach the game: a failed load counts as 0,
//! a failed save keeps the old best.

use crate::persistence::ScoreStore;

/// Cached best score over a durable store
#[derive(Debug)]
pub struct BestScore<S> {
    best: u32,
    store: S,
}

impl<S: ScoreStore> BestScore<S> {
    /// Read the persisted best (0 if absent or unreadable)
    pub fn load(store: S) -> Self {
        let best = match store.load() {
            Ok(best) => {
                log::info!("Loaded best score: {}", best);
                best
            }
            Err(e) => {
                log::warn!("Could not load best score, starting from 0: {}", e);
                0
            }
        };
        Self { best, store }
    }

    pub fn get(&self) -> u32 {
        self.best
    }

    /// Offer a finished round's score
    ///
    /// Returns `true` when `score` became the new best. The store is written
    /// exactly once in that case and never otherwise.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }

        match self.store.save(score) {
            Ok(()) => {
                log::info!("New best score: {} (was {})", score, self.best);
                self.best = score;
                true
            }
            Err(e) => {
                log::warn!("Could not save best score {}: {}", score, e);
                false
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StoreError};

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&self) -> Result<u32, StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }

        fn save(&self, _best: u32) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
    }

    #[test]
    fn test_monotonic_with_exact_saves() {
        let store = MemoryStore::with_best(4);
        let mut best = BestScore::load(store.clone());

        let rounds = [3, 4, 7, 2, 7, 9, 1];
        let mut expected = 4;
        let mut expected_saves = 0;
        for score in rounds {
            let beat = score > expected;
            assert_eq!(best.record(score), beat);
            if beat {
                expected = score;
                expected_saves += 1;
            }
            assert_eq!(best.get(), expected);
            assert_eq!(store.saves(), expected_saves);
        }
        assert_eq!(store.stored(), Some(9));
    }

    #[test]
    fn test_zero_never_saved() {
        let store = MemoryStore::new();
        let mut best = BestScore::load(store.clone());
        assert!(!best.record(0));
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn test_broken_store_degrades() {
        let mut best = BestScore::load(BrokenStore);
        assert_eq!(best.get(), 0);
        assert!(!best.record(12));
        assert_eq!(best.get(), 0);
    }
}
