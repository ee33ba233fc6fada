//! Grid Snake - a terminal Snake game
//!
//! This library provides:
//! - Core rules engine with deterministic, seedable food placement (game module)
//! - A period-swappable tick scheduler owned by the caller (scheduler module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Local persistence for the theme preference and leaderboard (persistence module)
//! - The interactive play loop tying it together (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
pub mod scheduler;
