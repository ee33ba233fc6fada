use std::time::{Duration, Instant};

use crate::game::TickResult;

/// Per-session counters shown in the header; never persisted
pub struct SessionStats {
    /// Set while a game is running
    started_at: Option<Instant>,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
    pub foods_eaten: u32,
}

impl SessionStats {
    /// Start a session, seeding the best score (e.g. from the leaderboard)
    pub fn new(best_score: u32) -> Self {
        Self {
            started_at: None,
            elapsed_time: Duration::ZERO,
            best_score,
            games_played: 0,
            foods_eaten: 0,
        }
    }

    /// Refresh the clock of the game in progress
    pub fn update(&mut self) {
        if let Some(started_at) = self.started_at {
            self.elapsed_time = started_at.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.started_at = Some(Instant::now());
        self.elapsed_time = Duration::ZERO;
        self.foods_eaten = 0;
    }

    pub fn on_tick(&mut self, result: &TickResult) {
        if result.ate_food {
            self.foods_eaten += 1;
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.started_at = None;
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new(0)
    }
}
