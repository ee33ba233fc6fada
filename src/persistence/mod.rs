//! Local persistence: a flat key-value store plus the two things kept in
//! it, the theme preference and the leaderboard.

pub mod leaderboard;
pub mod store;
pub mod theme;

pub use leaderboard::{LEADERBOARD_KEY, Leaderboard, LeaderboardEntry, MAX_ENTRIES, MAX_NAME_LEN};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use theme::{THEME_KEY, Theme, load_theme, save_theme};
