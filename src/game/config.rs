use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::Grid;
use super::spawner::SpawnFallback;
use super::state::Cell;

/// Configuration for the game
///
/// Board geometry is expressed in pixels; everything
/// the simulation touches is converted to grid cells through [`Grid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the board in pixels
    pub board_width: u32,
    /// Height of the board in pixels
    pub board_height: u32,
    /// Size of one grid unit in pixels
    pub grid_unit: u32,
    /// Distance in pixels from the board edge at which the wall sits
    pub wall_margin: u32,
    /// Extra cells between the wall and the area consumables spawn in
    pub spawn_inset: u32,
    /// Whether hitting the wall ends the game; without walls the board wraps
    pub walls_enabled: bool,

    /// Length of the snake at the start of a game
    pub initial_snake_length: usize,

    /// Delay between ticks at the start of a game
    pub initial_step_delay_ms: u64,
    /// Lower bound the speed curve never goes below
    pub min_step_delay_ms: u64,
    /// Amount the delay shrinks on every level-up
    pub speed_decrement_ms: u64,
    /// Consumables needed for a level-up
    pub level_up_threshold: u32,

    pub food_score: u32,
    pub power_up_score: u32,
    /// Segments added when a power-up is eaten
    pub power_up_growth: usize,
    /// Probability of a power-up appearing after a food pickup
    pub power_up_chance: f64,

    /// Random draws before the spawner gives up and uses its fallback
    pub max_spawn_attempts: u32,
    pub spawn_fallback: SpawnFallback,

    /// Seed for the consumable RNG; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 600,
            board_height: 600,
            grid_unit: 20,
            wall_margin: 10,
            spawn_inset: 1,
            walls_enabled: true,
            initial_snake_length: 1,
            initial_step_delay_ms: 120,
            min_step_delay_ms: 30,
            speed_decrement_ms: 5,
            level_up_threshold: 5,
            food_score: 10,
            power_up_score: 40,
            power_up_growth: 2,
            power_up_chance: 0.25,
            max_spawn_attempts: 50,
            spawn_fallback: SpawnFallback::Origin,
            seed: None,
        }
    }
}

/// A configuration that would break a simulation invariant
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid_unit must be positive")]
    ZeroGridUnit,
    #[error("{0} must be positive")]
    NonPositiveDelay(&'static str),
    #[error("min_step_delay_ms ({min}) cannot exceed initial_step_delay_ms ({initial})")]
    DelayFloorAboveInitial { min: u64, initial: u64 },
    #[error("level_up_threshold must be at least 1")]
    ZeroLevelThreshold,
    #[error("power_up_chance must be in [0, 1], got {0}")]
    ChanceOutOfRange(f64),
    #[error("max_spawn_attempts must be at least 1")]
    ZeroSpawnAttempts,
    #[error("initial_snake_length must be at least 1")]
    ZeroSnakeLength,
    #[error("board {width}x{height} with wall margin {margin} leaves no playable cell")]
    BoardTooSmall { width: u32, height: u32, margin: u32 },
    #[error("board cannot hold a snake of length {0}")]
    SnakeDoesNotFit(usize),
    #[error("spawn_inset {0} leaves no cell for consumables")]
    NoSpawnArea(u32),
    #[error("{field} is {value}, the largest supported value is {max}")]
    TooLarge {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

/// Upper bound for every pixel measure and for the snake length; keeps cell
/// arithmetic well inside `i32`
pub const MAX_BOARD_PIXELS: u32 = 1 << 16;

impl GameConfig {
    /// Create a new configuration with a custom board size in pixels
    pub fn new(board_width: u32, board_height: u32) -> Self {
        Self {
            board_width,
            board_height,
            ..Default::default()
        }
    }

    /// A board measured directly in cells: one pixel per grid unit, a wall
    /// margin of one cell and a half-extent of `half_extent` cells.
    pub fn cells(half_extent: u32) -> Self {
        Self {
            board_width: half_extent * 2,
            board_height: half_extent * 2,
            grid_unit: 1,
            wall_margin: 1,
            ..Default::default()
        }
    }

    /// Small board for tests and quick games
    pub fn small() -> Self {
        Self::cells(10)
    }

    /// Load a configuration from a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn initial_step_delay(&self) -> Duration {
        Duration::from_millis(self.initial_step_delay_ms)
    }

    pub fn min_step_delay(&self) -> Duration {
        Duration::from_millis(self.min_step_delay_ms)
    }

    pub fn speed_decrement(&self) -> Duration {
        Duration::from_millis(self.speed_decrement_ms)
    }

    /// Check every constraint the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_unit == 0 {
            return Err(ConfigError::ZeroGridUnit);
        }

        if self.initial_step_delay_ms == 0 {
            return Err(ConfigError::NonPositiveDelay("initial_step_delay_ms"));
        }

        if self.min_step_delay_ms == 0 {
            return Err(ConfigError::NonPositiveDelay("min_step_delay_ms"));
        }

        if self.min_step_delay_ms > self.initial_step_delay_ms {
            return Err(ConfigError::DelayFloorAboveInitial {
                min: self.min_step_delay_ms,
                initial: self.initial_step_delay_ms,
            });
        }

        if self.level_up_threshold == 0 {
            return Err(ConfigError::ZeroLevelThreshold);
        }

        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return Err(ConfigError::ChanceOutOfRange(self.power_up_chance));
        }

        if self.max_spawn_attempts == 0 {
            return Err(ConfigError::ZeroSpawnAttempts);
        }

        if self.initial_snake_length == 0 {
            return Err(ConfigError::ZeroSnakeLength);
        }

        let bounded = [
            ("board_width", self.board_width as u64),
            ("board_height", self.board_height as u64),
            ("grid_unit", self.grid_unit as u64),
            ("wall_margin", self.wall_margin as u64),
            ("spawn_inset", self.spawn_inset as u64),
            ("initial_snake_length", self.initial_snake_length as u64),
        ];
        for (field, value) in bounded {
            if value > MAX_BOARD_PIXELS as u64 {
                return Err(ConfigError::TooLarge {
                    field,
                    value,
                    max: MAX_BOARD_PIXELS as u64,
                });
            }
        }

        let grid = Grid::from_config(self);
        if !grid.in_bounds(Cell::ORIGIN) {
            return Err(ConfigError::BoardTooSmall {
                width: self.board_width,
                height: self.board_height,
                margin: self.wall_margin,
            });
        }

        let tail = Cell::new(0, 1 - self.initial_snake_length as i32);
        if !grid.in_bounds(tail) {
            return Err(ConfigError::SnakeDoesNotFit(self.initial_snake_length));
        }

        if grid.spawn_cells().next().is_none() {
            return Err(ConfigError::NoSpawnArea(self.spawn_inset));
        }

        Ok(())
    }
}
