//! Logger initialisation.
//!
//! The terminal belongs to the TUI, so log records go to a file instead of
//! stderr. Level is read from `SNAKE_LOG` (`env_logger` filter syntax).

use anyhow::{Context, Result};
use chrono::Local;
use env_logger::{Env, Target};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Environment variable for log level setting
pub const LOG_LEVEL_ENV: &str = "SNAKE_LOG";

const DEBUG_LOG_LEVEL: &str = "debug";
const RELEASE_LOG_LEVEL: &str = "info";

/// Route `log` records to `log_file`, appending. Call once from the binary.
pub fn init_logger(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {:?}", log_file))?;

    let default_level = if cfg!(debug_assertions) {
        DEBUG_LOG_LEVEL
    } else {
        RELEASE_LOG_LEVEL
    };

    env_logger::Builder::from_env(Env::default().filter_or(LOG_LEVEL_ENV, default_level))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {} {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialize logger")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_records_land_in_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("snake.log");

        init_logger(&path).unwrap();
        log::warn!("log file smoke test");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("WARN"));
        assert!(contents.contains("log file smoke test"));

        // The global logger can only be installed once
        assert!(init_logger(&path).is_err());
    }
}
