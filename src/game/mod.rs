//! Core game logic module for Snake
//!
//! This module contains the rules engine without any I/O, rendering or timing
//! dependencies. The caller owns the clock and the collaborators; the engine
//! only turns ticks and turn requests into state transitions.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{Difficulty, FoodPlacement, GameConfig, MAX_GRID_SIDE, SpeedPolicy};
pub use engine::{GameEngine, TickOutcome, TickResult};
pub use state::{CollisionType, GameState, Phase, Position, Snake};
