//! Random placement of consumables

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::snake::Snake;
use super::state::Cell;

/// What to do when no free cell turned up within the attempt budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpawnFallback {
    /// Use the grid origin, even if the snake is on it
    #[default]
    Origin,
    /// Scan the spawn area for the first free cell, then the origin
    FirstFree,
}

/// Where a consumable ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A random cell that was free
    Free(Cell),
    /// The fallback cell after the attempts ran out; may be occupied
    Fallback(Cell),
}

impl Placement {
    pub fn cell(&self) -> Cell {
        match self {
            Placement::Free(cell) | Placement::Fallback(cell) => *cell,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Placement::Fallback(_))
    }
}

pub struct Spawner {
    rng: StdRng,
    max_attempts: u32,
    fallback: SpawnFallback,
    power_up_chance: f64,
}

impl Spawner {
    pub fn new(
        seed: Option<u64>,
        max_attempts: u32,
        fallback: SpawnFallback,
        power_up_chance: f64,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            max_attempts,
            fallback,
            power_up_chance,
        }
    }

    /// Place a consumable on a spawn cell not covered by the snake or by any
    /// of `blocked` (the other consumable).
    pub fn place_random(
        &mut self,
        grid: &Grid,
        snake: &Snake,
        blocked: &[Cell],
    ) -> Placement {
        let candidates = grid.spawn_cell_count();
        let is_free = |cell: Cell| !grid.is_occupied(cell, snake) && !blocked.contains(&cell);

        if candidates > 0 {
            for _ in 0..self.max_attempts {
                let index = self.rng.gen_range(0..candidates);
                if let Some(cell) = grid.spawn_cell(index) {
                    if is_free(cell) {
                        return Placement::Free(cell);
                    }
                }
            }
        }

        let cell = match self.fallback {
            SpawnFallback::Origin => Cell::ORIGIN,
            SpawnFallback::FirstFree => grid
                .spawn_cells()
                .find(|c| is_free(*c))
                .unwrap_or(Cell::ORIGIN),
        };
        Placement::Fallback(cell)
    }

    /// Roll whether a power-up appears at this spawn opportunity
    pub fn roll_power_up(&mut self) -> bool {
        self.rng.gen_bool(self.power_up_chance)
    }
}
