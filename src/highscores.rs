//! Best score tracking
//!
//! The simulation only knows the current score. `ScoreBoard` pairs it with
//! the best score, and `BestScoreStore` is the persistence collaborator that
//! loads/saves the best as a single integer under a fixed key.

use serde::{Deserialize, Serialize};

use crate::platform::Storage;

/// Current and best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    /// Score of the running session (monotonic within it)
    pub current: u32,
    /// Best score across sessions
    pub best: u32,
}

impl ScoreBoard {
    pub fn new(best: u32) -> Self {
        Self { current: 0, best }
    }

    /// Record a finished session. Returns true if it set a new best.
    pub fn finish(&mut self, score: u32) -> bool {
        self.current = score;
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    pub fn reset_current(&mut self) {
        self.current = 0;
    }
}

/// Loads and saves the best score
pub struct BestScoreStore {
    storage: Box<dyn Storage>,
}

impl BestScoreStore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "gap_runner_best_score";

    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Stored best score, 0 if absent or unreadable
    pub fn load(&self) -> u32 {
        match self.storage.get(Self::STORAGE_KEY) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(best) => {
                    log::info!("Loaded best score {}", best);
                    best
                }
                Err(_) => {
                    log::warn!("Ignoring corrupt best score {:?}", raw);
                    0
                }
            },
            None => {
                log::info!("No best score found, starting fresh");
                0
            }
        }
    }

    /// Persist `score` if it beats what is stored. Returns the stored maximum.
    pub fn save_max(&mut self, score: u32) -> u32 {
        let stored = self.load();
        if score > stored {
            self.storage.set(Self::STORAGE_KEY, &score.to_string());
            log::info!("Best score saved ({})", score);
            score
        } else {
            stored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStorage;

    #[test]
    fn test_finish_tracks_best() {
        let mut board = ScoreBoard::new(5);
        assert!(!board.finish(3));
        assert_eq!(board.best, 5);
        assert!(board.finish(9));
        assert_eq!(board.best, 9);
        assert!(!board.finish(9));
        board.reset_current();
        assert_eq!(board.current, 0);
        assert_eq!(board.best, 9);
    }

    #[test]
    fn test_store_defaults_to_zero() {
        let store = BestScoreStore::new(Box::new(MemoryStorage::default()));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_store_keeps_maximum() {
        let mut store = BestScoreStore::new(Box::new(MemoryStorage::default()));
        assert_eq!(store.save_max(12), 12);
        assert_eq!(store.save_max(4), 12);
        assert_eq!(store.load(), 12);
    }

    #[test]
    fn test_corrupt_value_reads_as_zero() {
        let mut storage = MemoryStorage::default();
        storage.set(BestScoreStore::STORAGE_KEY, "lots");
        let store = BestScoreStore::new(Box::new(storage));
        assert_eq!(store.load(), 0);
    }
}
