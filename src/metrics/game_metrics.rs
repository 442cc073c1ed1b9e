use std::time::{Duration, Instant};

use crate::game::{GameState, TickOutcome};

/// Per-session tallies shown next to the board
///
/// The clock covers the current game only; everything else accumulates
/// over the whole session.
#[derive(Debug)]
pub struct GameMetrics {
    game_started: Instant,
    pub game_time: Duration,
    pub games_played: u32,
    /// Longest snake seen in any game
    pub longest_snake: usize,
    /// Highest level reached in any game
    pub best_level: u32,
    pub consumables_eaten: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            game_started: Instant::now(),
            game_time: Duration::ZERO,
            games_played: 0,
            longest_snake: 0,
            best_level: 1,
            consumables_eaten: 0,
        }
    }

    pub fn update(&mut self) {
        self.game_time = self.game_started.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.game_started = Instant::now();
        self.game_time = Duration::ZERO;
    }

    /// Fold one tick's result into the tallies
    pub fn record_tick(&mut self, outcome: &TickOutcome, state: &GameState) {
        if outcome.collision.is_consumable() {
            self.consumables_eaten += 1;
        }
        if outcome.terminated() {
            self.games_played += 1;
        }
        self.longest_snake = self.longest_snake.max(state.snake.len());
        self.best_level = self.best_level.max(state.level);
    }

    /// Game clock as `mm:ss`
    pub fn clock(&self) -> String {
        let secs = self.game_time.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
