use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use elemental_snake::game::{ElementTable, GameConfig};
use elemental_snake::modes::HumanMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "elemental_snake")]
#[command(version, about = "Snake with elemental food and reactions")]
struct Cli {
    /// TOML config file; missing or malformed files fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Initial snake length
    #[arg(long)]
    initial_length: Option<usize>,

    /// Maximum number of food items on the grid
    #[arg(long)]
    max_food: Option<usize>,

    /// Seconds between snake moves
    #[arg(long)]
    interval: Option<f64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load_or_default(path),
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(length) = self.initial_length {
            config.initial_snake_length = length;
        }
        if let Some(max) = self.max_food {
            config.max_food_count = max;
        }
        if let Some(interval) = self.interval {
            config.move_interval_secs = interval;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid game settings")?;
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("elemental_snake=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config()?;
    let table = match &config.element_table {
        Some(path) => ElementTable::load_or_default(path),
        None => ElementTable::default(),
    };
    tracing::info!(
        width = config.grid_width,
        height = config.grid_height,
        seed = ?config.seed,
        "starting"
    );

    let mut human_mode = HumanMode::new(config, Arc::new(table));
    human_mode.run().await?;

    Ok(())
}
