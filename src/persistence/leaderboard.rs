//! Local high-score table.
//!
//! Entries are kept sorted by descending score and capped at
//! [`MAX_ENTRIES`]. Ties keep insertion order, so an older entry outranks a
//! newer one with the same score.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use super::store::KeyValueStore;
use crate::game::Difficulty;

pub const LEADERBOARD_KEY: &str = "leaderboard";

/// Number of entries kept and displayed
pub const MAX_ENTRIES: usize = 10;

pub const MAX_NAME_LEN: usize = 16;

const ANONYMOUS: &str = "Anonymous";

/// One finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub difficulty: Difficulty,
    pub timestamp: DateTime<Utc>,
}

impl LeaderboardEntry {
    /// Build an entry stamped with the current time
    pub fn new(name: &str, score: u32, difficulty: Difficulty) -> Self {
        Self::at(name, score, difficulty, Utc::now())
    }

    pub fn at(name: &str, score: u32, difficulty: Difficulty, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: normalize_name(name),
            score,
            difficulty,
            timestamp,
        }
    }
}

/// Trim, cap the length, and fall back to a placeholder for blank names
pub fn normalize_name(name: &str) -> String {
    let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    if trimmed.is_empty() {
        ANONYMOUS.to_string()
    } else {
        trimmed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the stored board. Missing or corrupt data yields an empty board.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(LEADERBOARD_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(err) => {
                warn!("failed to read leaderboard, starting empty: {err:#}");
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<LeaderboardEntry>>(&raw) {
            Ok(entries) => Self::from_entries(entries),
            Err(err) => {
                warn!("corrupt leaderboard data, starting empty: {err}");
                Self::new()
            }
        }
    }

    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(&self.entries).context("Failed to serialize leaderboard")?;
        store
            .set(LEADERBOARD_KEY, json)
            .context("Failed to persist leaderboard")
    }

    /// Whether a finished game with `score` earns a place on the board
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        match self.entries.last() {
            Some(lowest) if self.entries.len() >= MAX_ENTRIES => score > lowest.score,
            _ => true,
        }
    }

    /// Insert an entry, returning its zero-based rank if it made the cut
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|existing| entry.score > existing.score)
            .unwrap_or(self.entries.len());
        if rank >= MAX_ENTRIES {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn top(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn best_score(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{JsonFileStore, MemoryStore};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        LeaderboardEntry::at(name, score, Difficulty::Easy, timestamp)
    }

    fn full_board() -> Leaderboard {
        Leaderboard::from_entries((1..=10).map(|i| entry(&format!("p{i}"), i * 10)).collect())
    }

    #[test]
    fn test_round_trip_sorted() {
        let mut store = MemoryStore::new();
        let mut board = Leaderboard::new();
        board.insert(entry("ann", 30));
        board.insert(entry("bob", 50));
        board.save(&mut store).unwrap();

        let mut reloaded = Leaderboard::load(&store);
        reloaded.insert(entry("cy", 40));
        reloaded.save(&mut store).unwrap();

        let final_board = Leaderboard::load(&store);
        let scores: Vec<u32> = final_board.top().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![50, 40, 30]);
        assert!(final_board.top().iter().any(|e| e.name == "cy"));
    }

    #[test]
    fn test_unreadable_store_degrades_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "not json at all").unwrap();
        let mut store = JsonFileStore::new(&path);

        assert!(store.get(LEADERBOARD_KEY).is_err());
        let mut board = Leaderboard::load(&store);
        assert!(board.is_empty());

        board.insert(entry("dee", 70));
        board.save(&mut store).unwrap();
        assert_eq!(Leaderboard::load(&store).best_score(), Some(70));
    }

    #[test]
    fn test_missing_and_corrupt_data_degrade_to_empty() {
        let mut store = MemoryStore::new();
        assert!(Leaderboard::load(&store).is_empty());

        store.set(LEADERBOARD_KEY, "[{\"name\": 3}".to_string()).unwrap();
        assert!(Leaderboard::load(&store).is_empty());
    }

    #[test]
    fn test_capped_at_ten() {
        let mut board = full_board();
        assert_eq!(board.len(), MAX_ENTRIES);

        assert_eq!(board.insert(entry("new", 55)), Some(5));
        assert_eq!(board.len(), MAX_ENTRIES);
        assert_eq!(board.top().last().unwrap().score, 20);

        assert_eq!(board.insert(entry("low", 5)), None);
        assert_eq!(board.len(), MAX_ENTRIES);
    }

    #[test]
    fn test_qualifies() {
        let mut board = Leaderboard::new();
        assert!(!board.qualifies(0));
        assert!(board.qualifies(10));

        board = full_board();
        assert!(!board.qualifies(10));
        assert!(board.qualifies(11));
    }

    #[test]
    fn test_ties_keep_older_entry_first() {
        let mut board = Leaderboard::new();
        board.insert(entry("first", 40));
        board.insert(entry("second", 40));

        assert_eq!(board.top()[0].name, "first");
        assert_eq!(board.top()[1].name, "second");
    }

    #[test]
    fn test_unsorted_storage_is_sorted_on_load() {
        let mut store = MemoryStore::new();
        let entries = vec![entry("a", 10), entry("b", 90), entry("c", 40)];
        store
            .set(LEADERBOARD_KEY, serde_json::to_string(&entries).unwrap())
            .unwrap();

        let board = Leaderboard::load(&store);
        assert_eq!(board.best_score(), Some(90));
        assert_eq!(board.top()[2].name, "a");
    }

    #[test]
    fn test_name_normalization() {
        assert_eq!(normalize_name("  ada  "), "ada");
        assert_eq!(normalize_name("   "), "Anonymous");
        assert_eq!(normalize_name("abcdefghijklmnopqrstuvwxyz").len(), MAX_NAME_LEN);
    }
}
