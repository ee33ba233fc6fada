use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::{Difficulty, FoodPlacement, GameConfig, GameEngine, SpeedPolicy};
use grid_snake::logging::init_logger;
use grid_snake::modes::PlayMode;
use grid_snake::persistence::JsonFileStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake in the terminal, with a local leaderboard")]
struct Cli {
    /// Grid width
    #[arg(long, default_value = "20")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "20")]
    height: usize,

    /// Starting difficulty
    #[arg(long, value_enum, default_value = "easy")]
    difficulty: Difficulty,

    /// When eating food speeds the game up
    #[arg(long, value_enum, default_value = "every-food")]
    speed_policy: SpeedPolicy,

    /// Where new food may spawn
    #[arg(long, value_enum, default_value = "free-cell")]
    food_placement: FoodPlacement,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding the leaderboard and preferences
    #[arg(long, default_value = ".grid_snake")]
    data_dir: PathBuf,

    /// Log file (defaults to <data-dir>/grid_snake.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GameConfig::new(cli.width, cli.height)
        .with_difficulty(cli.difficulty)
        .with_speed_policy(cli.speed_policy)
        .with_food_placement(cli.food_placement);
    config.validate().context("Invalid game configuration")?;

    std::fs::create_dir_all(&cli.data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", cli.data_dir))?;
    let log_file = cli
        .log_file
        .unwrap_or_else(|| cli.data_dir.join("grid_snake.log"));
    init_logger(&log_file)?;

    log::info!("starting with {:?}", config);

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };
    let store = JsonFileStore::new(cli.data_dir.join("store.json"));

    let mut play_mode = PlayMode::new(engine, store);
    play_mode.run().await?;

    Ok(())
}
