//! Classification of a candidate head move

use super::grid::Grid;
use super::state::{Cell, CollisionType, GameState};

/// Outcome of moving the head onto a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfCollision,
    Food,
    PowerUp,
    /// Nothing in the way
    Clear,
}

impl Collision {
    /// The game-ending cause, if this outcome is fatal
    pub fn fatal(&self) -> Option<CollisionType> {
        match self {
            Collision::Wall => Some(CollisionType::Wall),
            Collision::SelfCollision => Some(CollisionType::SelfCollision),
            _ => None,
        }
    }

    pub fn is_consumable(&self) -> bool {
        matches!(self, Collision::Food | Collision::PowerUp)
    }
}

/// Classify `candidate` against walls, the body and the consumables, in that
/// order. A fatal hit always wins over a consumable on the same cell.
pub fn classify(candidate: Cell, state: &GameState, grid: &Grid, walls_enabled: bool) -> Collision {
    if walls_enabled && !grid.in_bounds(candidate) {
        return Collision::Wall;
    }

    let consumable = if state.food.is_some_and(|f| f.is_at(candidate)) {
        Collision::Food
    } else if state.power_up.is_some_and(|p| p.is_at(candidate)) {
        Collision::PowerUp
    } else {
        Collision::Clear
    };

    // Eating keeps the tail in place, so the tail cell only counts as free
    // when nothing is eaten.
    let hits_self = if consumable.is_consumable() {
        state.snake.collides_with_self_growing(candidate)
    } else {
        state.snake.collides_with_self(candidate)
    };
    if hits_self {
        return Collision::SelfCollision;
    }

    consumable
}
