use std::time::Duration;

use super::action::Direction;
use super::config::GameConfig;
use super::grid::Grid;
use super::state::{Cell, CollisionType, Consumable, GameState, Phase};

/// Read-only copy of everything a render sink draws, taken between ticks
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Snake cells, head first
    pub snake: Vec<Cell>,
    pub heading: Option<Direction>,
    pub food: Option<Consumable>,
    pub power_up: Option<Consumable>,
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub level_progress: u32,
    pub level_up_threshold: u32,
    pub step_delay: Duration,
    pub phase: Phase,
    pub game_over: Option<CollisionType>,
    pub ticks: u64,
    /// Largest playable cell coordinate on each axis
    pub max_cell: (i32, i32),
}

impl Snapshot {
    pub fn capture(state: &GameState, config: &GameConfig, grid: &Grid) -> Self {
        Self {
            snake: state.snake.cells().copied().collect(),
            heading: state.heading,
            food: state.food,
            power_up: state.power_up,
            score: state.score,
            high_score: state.high_score,
            level: state.level,
            level_progress: state.level_progress,
            level_up_threshold: config.level_up_threshold,
            step_delay: state.step_delay,
            phase: state.phase,
            game_over: state.game_over,
            ticks: state.ticks,
            max_cell: grid.max_cell().unwrap_or((0, 0)),
        }
    }

    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    pub fn steps_per_second(&self) -> f64 {
        let secs = self.step_delay.as_secs_f64();
        if secs > 0.0 {
            1.0 / secs
        } else {
            0.0
        }
    }

    /// The consumable drawn at `cell`, if a visible one sits there
    pub fn consumable_at(&self, cell: Cell) -> Option<&Consumable> {
        [self.food.as_ref(), self.power_up.as_ref()]
            .into_iter()
            .flatten()
            .find(|c| c.is_at(cell))
    }
}
