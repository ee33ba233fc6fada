use anyhow::{Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::state::Position;

/// Largest grid side accepted; cells are addressed with `i32` coordinates
pub const MAX_GRID_SIDE: usize = 1024;

/// Named policy bundle controlling base speed and speed escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Milliseconds per tick at the start of a game
    pub fn base_speed_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 150,
            Difficulty::Normal => 110,
            Difficulty::Hard => 75,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Next difficulty in the Easy -> Normal -> Hard -> Easy cycle
    pub fn next(&self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

/// When eating food speeds the game up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SpeedPolicy {
    /// Accelerate on every food, whatever the difficulty
    EveryFood,
    /// Accelerate only on Easy; other difficulties keep their base speed
    EasyOnly,
}

impl SpeedPolicy {
    pub fn accelerates(&self, difficulty: Difficulty) -> bool {
        match self {
            SpeedPolicy::EveryFood => true,
            SpeedPolicy::EasyOnly => difficulty == Difficulty::Easy,
        }
    }
}

/// Where new food may appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FoodPlacement {
    /// Uniformly among cells the snake does not cover
    FreeCell,
    /// Uniformly over the whole grid; food may land on the snake
    Unchecked,
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Cell the snake starts on
    pub start: Position,
    pub difficulty: Difficulty,
    pub speed_policy: SpeedPolicy,
    pub food_placement: FoodPlacement,
    /// Score gained per food
    pub food_reward: u32,
    /// Milliseconds shaved off the tick period per accelerating food
    pub speed_step_ms: u64,
    /// The tick period never drops below this
    pub min_speed_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            start: Position::new(5, 5),
            difficulty: Difficulty::Easy,
            speed_policy: SpeedPolicy::EveryFood,
            food_placement: FoodPlacement::FreeCell,
            food_reward: 10,
            speed_step_ms: 5,
            min_speed_ms: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_speed_policy(mut self, policy: SpeedPolicy) -> Self {
        self.speed_policy = policy;
        self
    }

    pub fn with_food_placement(mut self, placement: FoodPlacement) -> Self {
        self.food_placement = placement;
        self
    }

    /// Reject grids that cannot hold the start cell or are too large to index
    pub fn validate(&self) -> Result<()> {
        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            bail!(
                "grid {}x{} exceeds the {}x{} limit",
                self.grid_width,
                self.grid_height,
                MAX_GRID_SIDE,
                MAX_GRID_SIDE
            );
        }
        let Position { x, y } = self.start;
        if x < 0 || y < 0 || x as usize >= self.grid_width || y as usize >= self.grid_height {
            bail!(
                "grid {}x{} does not contain the start cell ({}, {})",
                self.grid_width,
                self.grid_height,
                x,
                y
            );
        }
        let cells = self.grid_width.checked_mul(self.grid_height);
        if cells.is_none_or(|cells| cells < 2) {
            bail!("grid needs room for food next to the snake");
        }
        if self.min_speed_ms == 0 {
            bail!("minimum speed must be at least 1ms per tick");
        }
        Ok(())
    }
}
