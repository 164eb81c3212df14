use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::catalog::FoodCatalog;
use crate::error::{ConfigError, Result};

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Cap on plain and tagged food on the grid
    pub max_food_count: usize,
    /// Cap on element food on the grid
    pub max_element_food_count: usize,
    /// Seconds between two snake moves
    pub move_interval_secs: f64,
    /// Chance that newly spawned food carries an element
    pub element_food_probability: f64,
    /// Fixed seed for every random source, entropy when unset
    pub seed: Option<u64>,
    /// Optional TOML file replacing the built-in element table
    pub element_table: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 25,
            grid_height: 25,
            initial_snake_length: 3,
            max_food_count: 5,
            max_element_food_count: 2,
            move_interval_secs: 0.3,
            element_food_probability: 0.5,
            seed: None,
            element_table: None,
        }
    }
}

/// On-disk layout: `[grid]`, `[snake]`, `[food]` and `[game]` sections whose
/// keys override the defaults one by one.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    grid: GridSection,
    #[serde(default)]
    snake: SnakeSection,
    #[serde(default)]
    food: FoodSection,
    #[serde(default)]
    game: GameSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    width: Option<usize>,
    height: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnakeSection {
    initial_length: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FoodSection {
    max_count: Option<usize>,
    max_element_count: Option<usize>,
    element_probability: Option<f64>,
    element_table: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GameSection {
    move_interval: Option<f64>,
    seed: Option<u64>,
}

impl ConfigFile {
    fn apply(self, config: &mut GameConfig) {
        let ConfigFile {
            grid,
            snake,
            food,
            game,
        } = self;

        if let Some(width) = grid.width {
            config.grid_width = width;
        }
        if let Some(height) = grid.height {
            config.grid_height = height;
        }
        if let Some(length) = snake.initial_length {
            config.initial_snake_length = length;
        }
        if let Some(max) = food.max_count {
            config.max_food_count = max;
        }
        if let Some(max) = food.max_element_count {
            config.max_element_food_count = max;
        }
        if let Some(p) = food.element_probability {
            config.element_food_probability = p;
        }
        if food.element_table.is_some() {
            config.element_table = food.element_table;
        }
        if let Some(interval) = game.move_interval {
            config.move_interval_secs = interval;
        }
        if game.seed.is_some() {
            config.seed = game.seed;
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

    /// Small seeded grid for tests
    pub fn small() -> Self {
        Self {
            seed: Some(7),
            ..Self::new(10, 10)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Self::default();
        file.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;

        // A relative element table path is taken relative to the config file
        if let Some(table) = config.element_table.take() {
            config.element_table = Some(match path.parent() {
                Some(dir) if table.is_relative() => dir.join(table),
                _ => table,
            });
        }
        Ok(config)
    }

    /// Load `path`, falling back to the defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                tracing::info!(?path, "loaded game config");
                config
            }
            Err(err) => {
                tracing::warn!(?path, %err, "using default game config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::invalid(format!(
                "grid must be non-empty, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if i32::try_from(self.grid_width).is_err() || i32::try_from(self.grid_height).is_err() {
            return Err(ConfigError::invalid("grid is too large"));
        }
        if self.initial_snake_length == 0 {
            return Err(ConfigError::invalid("initial snake length must be positive"));
        }
        // The snake starts at the center and trails to the left
        if self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(ConfigError::invalid(format!(
                "a snake of length {} does not fit a grid {} wide",
                self.initial_snake_length, self.grid_width
            )));
        }
        if !self.move_interval_secs.is_finite() || self.move_interval_secs <= 0.0 {
            return Err(ConfigError::invalid(format!(
                "move interval must be positive, got {}",
                self.move_interval_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.element_food_probability) {
            return Err(ConfigError::invalid(format!(
                "element food probability must be within [0, 1], got {}",
                self.element_food_probability
            )));
        }
        Ok(())
    }

    pub fn move_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.move_interval_secs).unwrap_or(Duration::from_millis(300))
    }

    pub fn catalog(&self) -> FoodCatalog {
        FoodCatalog::new(self.element_food_probability)
    }
}
