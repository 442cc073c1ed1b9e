use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::snake::Snake;

/// A cell on the game grid, in grid units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move cell one unit in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsumableKind {
    Food,
    /// The Xenia power-up: bigger score, bonus growth, no expiry
    PowerUp,
}

/// Something the snake head can collect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consumable {
    pub kind: ConsumableKind,
    pub position: Cell,
    pub visible: bool,
}

impl Consumable {
    pub fn new(kind: ConsumableKind, position: Cell) -> Self {
        Self {
            kind,
            position,
            visible: true,
        }
    }

    /// True iff the consumable is on the board at `cell`
    pub fn is_at(&self, cell: Cell) -> bool {
        self.visible && self.position == cell
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Top-level state of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    Over,
}

/// What ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state
///
/// Owned by the caller and handed to [`GameEngine`](super::GameEngine) for
/// every operation; nothing else mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Current heading; `None` until the first direction is given
    pub heading: Option<Direction>,
    /// Direction of the last step the snake actually took
    pub last_move: Option<Direction>,
    pub food: Option<Consumable>,
    pub power_up: Option<Consumable>,
    pub score: u32,
    /// Best score since the process started, kept across restarts
    pub high_score: u32,
    /// Level-ups reached, starting at 1
    pub level: u32,
    /// Consumables eaten since the last level-up
    pub level_progress: u32,
    pub step_delay: Duration,
    pub phase: Phase,
    pub ticks: u64,
    pub game_over: Option<CollisionType>,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, step_delay: Duration) -> Self {
        Self {
            snake,
            heading: None,
            last_move: None,
            food: None,
            power_up: None,
            score: 0,
            high_score: 0,
            level: 1,
            level_progress: 0,
            step_delay,
            phase: Phase::Running,
            ticks: 0,
            game_over: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    /// Where the snake is travelling: the last step taken, or before the
    /// first step the way the body points
    pub fn travel_direction(&self) -> Option<Direction> {
        self.last_move.or_else(|| self.snake.facing())
    }

    /// The visible power-up, if any
    pub fn active_power_up(&self) -> Option<&Consumable> {
        self.power_up.as_ref().filter(|p| p.visible)
    }

    /// Raise the high score to the current score if it was beaten
    pub fn record_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_movement() {
        let cell = Cell::new(5, 5);
        assert_eq!(cell.moved_by(1, 0), Cell::new(6, 5));
        assert_eq!(cell.moved_by(-1, 0), Cell::new(4, 5));
        assert_eq!(cell.moved_by(0, 1), Cell::new(5, 6));
        assert_eq!(cell.moved_by(0, -1), Cell::new(5, 4));
        assert_eq!(cell.moved_in_direction(Direction::Up), Cell::new(5, 6));
    }

    #[test]
    fn test_hidden_consumable_is_not_hit() {
        let mut food = Consumable::new(ConsumableKind::Food, Cell::new(2, 0));
        assert!(food.is_at(Cell::new(2, 0)));
        food.hide();
        assert!(!food.is_at(Cell::new(2, 0)));
    }

    #[test]
    fn test_high_score_only_rises() {
        let mut state = GameState::new(
            Snake::new(Cell::ORIGIN, 1, Direction::Up),
            Duration::from_millis(100),
        );
        state.score = 30;
        assert!(state.record_high_score());
        assert_eq!(state.high_score, 30);

        state.score = 10;
        assert!(!state.record_high_score());
        assert_eq!(state.high_score, 30);
    }

    #[test]
    fn test_travel_direction_prefers_last_move() {
        let mut state = GameState::new(
            Snake::new(Cell::ORIGIN, 3, Direction::Up),
            Duration::from_millis(100),
        );
        assert_eq!(state.travel_direction(), Some(Direction::Up));

        state.last_move = Some(Direction::Right);
        assert_eq!(state.travel_direction(), Some(Direction::Right));
    }

    #[test]
    fn test_new_state_waits_for_direction() {
        let state = GameState::new(
            Snake::new(Cell::ORIGIN, 1, Direction::Up),
            Duration::from_millis(100),
        );
        assert!(state.is_running());
        assert_eq!(state.heading, None);
        assert_eq!(state.travel_direction(), None);
        assert_eq!(state.level, 1);
        assert_eq!(state.level_progress, 0);
    }
}
