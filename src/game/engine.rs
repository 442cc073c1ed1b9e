use log::{debug, info, warn};

use super::{
    action::Direction,
    collision::{self, Collision},
    config::{ConfigError, GameConfig},
    grid::Grid,
    snapshot::Snapshot,
    spawner::{Placement, Spawner},
    state::{Cell, CollisionType, Consumable, ConsumableKind, GameState, Phase},
    snake::Snake,
};

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Whether the snake advanced this tick
    pub moved: bool,
    /// Classification of the attempted move
    pub collision: Collision,
    /// Where replacement food went, if food was eaten
    pub food_placement: Option<Placement>,
    /// Whether the speed curve advanced
    pub leveled_up: bool,
}

impl TickOutcome {
    fn idle() -> Self {
        Self {
            moved: false,
            collision: Collision::Clear,
            food_placement: None,
            leveled_up: false,
        }
    }

    /// Whether this tick ended the game
    pub fn terminated(&self) -> bool {
        self.collision.fatal().is_some()
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    spawner: Spawner,
}

impl GameEngine {
    /// Create a new game engine, rejecting configurations the simulation
    /// cannot run with
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::from_config(&config);
        let spawner = Spawner::new(
            config.seed,
            config.max_spawn_attempts,
            config.spawn_fallback,
            config.power_up_chance,
        );
        Ok(Self {
            config,
            grid,
            spawner,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Start the first game of a session: food placed and a power-up rolled
    pub fn new_game(&mut self) -> GameState {
        let mut state = self.fresh_state();
        self.place_food(&mut state);
        self.roll_power_up(&mut state);
        info!("new game on a {:?} board", self.grid.dimensions());
        state
    }

    /// Reset everything but the high score
    pub fn restart(&mut self, state: &mut GameState) {
        let high_score = state.high_score.max(state.score);
        *state = self.fresh_state();
        state.high_score = high_score;
        self.place_food(state);
        info!("game restarted, high score {}", high_score);
    }

    /// Request a new heading. Reversals of either the pending heading or the
    /// last step taken are ignored; returns whether the heading changed.
    pub fn steer(&self, state: &mut GameState, direction: Direction) -> bool {
        if state.is_over() {
            return false;
        }
        // A heading that has not been stepped yet counts as well
        let reverses = |d: Option<Direction>| d.is_some_and(|d| d.is_opposite(direction));
        if reverses(state.heading) || reverses(state.travel_direction()) {
            debug!(
                "ignored reversal {:?} (heading {:?}, travelling {:?})",
                direction,
                state.heading,
                state.travel_direction()
            );
            return false;
        }
        let changed = state.heading != Some(direction);
        state.heading = Some(direction);
        changed
    }

    /// Running <-> Paused; nothing happens once the game is over
    pub fn toggle_pause(&self, state: &mut GameState) {
        state.phase = match state.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::Over => Phase::Over,
        };
    }

    /// Execute one tick of the game
    pub fn tick(&mut self, state: &mut GameState) -> TickOutcome {
        if !state.is_running() {
            return TickOutcome::idle();
        }
        let Some(heading) = state.heading else {
            return TickOutcome::idle();
        };

        let mut candidate = state.snake.next_head(heading);
        if !self.config.walls_enabled && !self.grid.in_bounds(candidate) {
            candidate = self.grid.wrap(candidate);
        }

        let collision =
            collision::classify(candidate, state, &self.grid, self.config.walls_enabled);

        if let Some(cause) = collision.fatal() {
            self.end_game(state, cause);
            return TickOutcome {
                moved: false,
                collision,
                food_placement: None,
                leveled_up: false,
            };
        }

        state.snake.step(candidate);
        state.last_move = Some(heading);

        let mut food_placement = None;
        let mut leveled_up = false;

        match collision {
            Collision::Food => {
                state.score += self.config.food_score;
                state.snake.grow();
                if let Some(food) = state.food.as_mut() {
                    food.hide();
                }
                food_placement = Some(self.place_food(state));
                self.roll_power_up(state);
                leveled_up = self.advance_level(state);
                debug!("food eaten at {:?}, score {}", candidate, state.score);
            }
            Collision::PowerUp => {
                state.score += self.config.power_up_score;
                state.snake.grow_by(self.config.power_up_growth);
                if let Some(power_up) = state.power_up.as_mut() {
                    power_up.hide();
                }
                leveled_up = self.advance_level(state);
                debug!("power-up eaten at {:?}, score {}", candidate, state.score);
            }
            _ => {}
        }

        state.record_high_score();
        state.ticks += 1;

        TickOutcome {
            moved: true,
            collision,
            food_placement,
            leveled_up,
        }
    }

    pub fn snapshot(&self, state: &GameState) -> Snapshot {
        Snapshot::capture(state, &self.config, &self.grid)
    }

    fn fresh_state(&self) -> GameState {
        let snake = Snake::new(
            Cell::ORIGIN,
            self.config.initial_snake_length,
            Direction::Up,
        );
        GameState::new(snake, self.config.initial_step_delay())
    }

    fn end_game(&self, state: &mut GameState, cause: CollisionType) {
        state.phase = Phase::Over;
        state.heading = None;
        state.game_over = Some(cause);
        let new_best = state.record_high_score();
        info!(
            "game over ({:?}) with score {}{}",
            cause,
            state.score,
            if new_best { ", new high score" } else { "" }
        );
    }

    fn place_food(&mut self, state: &mut GameState) -> Placement {
        let blocked: Vec<Cell> = state
            .active_power_up()
            .map(|p| p.position)
            .into_iter()
            .collect();
        let placement = self
            .spawner
            .place_random(&self.grid, &state.snake, &blocked);
        state.food = Some(self.consumable(ConsumableKind::Food, placement));
        placement
    }

    /// At most one power-up: either (re)place it or take the current one away
    fn roll_power_up(&mut self, state: &mut GameState) {
        if self.spawner.roll_power_up() {
            let blocked: Vec<Cell> = state.food.iter().map(|f| f.position).collect();
            let placement = self
                .spawner
                .place_random(&self.grid, &state.snake, &blocked);
            state.power_up = Some(self.consumable(ConsumableKind::PowerUp, placement));
        } else if let Some(power_up) = state.power_up.as_mut() {
            power_up.hide();
        }
    }

    fn consumable(&self, kind: ConsumableKind, placement: Placement) -> Consumable {
        if placement.is_fallback() {
            warn!(
                "no free cell for {:?} after {} attempts, falling back to {:?}",
                kind,
                self.config.max_spawn_attempts,
                placement.cell()
            );
        } else {
            debug!("{:?} placed at {:?}", kind, placement.cell());
        }
        Consumable::new(kind, placement.cell())
    }

    fn advance_level(&self, state: &mut GameState) -> bool {
        state.level_progress += 1;
        if state.level_progress < self.config.level_up_threshold {
            return false;
        }

        state.level_progress = 0;
        state.level += 1;
        state.step_delay = state
            .step_delay
            .saturating_sub(self.config.speed_decrement())
            .max(self.config.min_step_delay());
        info!(
            "level {} reached, step delay {:?}",
            state.level, state.step_delay
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn engine(config: GameConfig) -> GameEngine {
        GameEngine::new(GameConfig {
            seed: Some(7),
            ..config
        })
        .unwrap()
    }

    /// Leave exactly one consumable on the board: food at `cell`
    fn put_food(state: &mut GameState, cell: Cell) {
        state.food = Some(Consumable::new(ConsumableKind::Food, cell));
        state.power_up = None;
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = GameConfig::default();
        config.initial_step_delay_ms = 0;
        assert!(GameEngine::new(config).is_err());
    }

    #[test]
    fn test_new_game() {
        let mut engine = engine(GameConfig::default());
        let state = engine.new_game();

        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.heading, None);
        assert_eq!(state.step_delay, Duration::from_millis(120));
        let food = state.food.unwrap();
        assert!(food.visible);
        assert!(!state.snake.contains(food.position));
    }

    #[test]
    fn test_no_movement_without_heading() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();

        let outcome = engine.tick(&mut state);

        assert!(!outcome.moved);
        assert_eq!(state.snake.head(), Cell::ORIGIN);
        assert_eq!(state.ticks, 0);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        put_food(&mut state, Cell::new(5, 5));
        engine.steer(&mut state, Direction::Right);

        let outcome = engine.tick(&mut state);

        assert!(outcome.moved);
        assert!(!outcome.terminated());
        assert_eq!(state.snake.head(), Cell::new(1, 0));
        assert_eq!(state.ticks, 1);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        put_food(&mut state, Cell::new(1, 0));
        engine.steer(&mut state, Direction::Right);

        let outcome = engine.tick(&mut state);

        assert_eq!(outcome.collision, Collision::Food);
        assert_eq!(state.score, 10);
        assert_eq!(state.high_score, 10);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.level_progress, 1);
        let food = state.food.unwrap();
        assert!(food.visible);
        assert!(!state.snake.contains(food.position));
        assert_eq!(outcome.food_placement.map(|p| p.cell()), Some(food.position));
    }

    #[test]
    fn test_power_up_consumption() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        put_food(&mut state, Cell::new(5, 5));
        state.power_up = Some(Consumable::new(ConsumableKind::PowerUp, Cell::new(1, 0)));
        engine.steer(&mut state, Direction::Right);

        let outcome = engine.tick(&mut state);

        assert_eq!(outcome.collision, Collision::PowerUp);
        assert_eq!(state.score, 40);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.snake.pending_growth(), 1);
        assert!(!state.power_up.unwrap().visible);
        assert_eq!(state.level_progress, 1);

        engine.tick(&mut state);
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_power_up_roll_on_food() {
        let mut always = engine(GameConfig {
            power_up_chance: 1.0,
            ..GameConfig::small()
        });
        let mut state = always.new_game();
        assert!(state.active_power_up().is_some());
        put_food(&mut state, Cell::new(1, 0));
        always.steer(&mut state, Direction::Right);
        always.tick(&mut state);
        let power_up = state.active_power_up().copied().unwrap();
        assert_ne!(Some(power_up.position), state.food.map(|f| f.position));
        assert!(!state.snake.contains(power_up.position));

        let mut never = engine(GameConfig {
            power_up_chance: 0.0,
            ..GameConfig::small()
        });
        let mut state = never.new_game();
        put_food(&mut state, Cell::new(1, 0));
        state.power_up = Some(Consumable::new(ConsumableKind::PowerUp, Cell::new(4, 4)));
        never.steer(&mut state, Direction::Right);
        never.tick(&mut state);
        assert!(state.active_power_up().is_none());
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        put_food(&mut state, Cell::new(0, 5));
        state.snake = Snake::new(Cell::new(-8, 0), 3, Direction::Left);
        state.score = 50;
        engine.steer(&mut state, Direction::Left);

        let outcome = engine.tick(&mut state);

        assert!(outcome.terminated());
        assert!(state.is_over());
        assert_eq!(outcome.collision, Collision::Wall);
        assert_eq!(state.game_over, Some(CollisionType::Wall));
        assert_eq!(state.heading, None);
        assert_eq!(state.high_score, 50);
        assert_eq!(state.snake.head(), Cell::new(-8, 0));
    }

    #[test]
    fn test_wrap_without_walls() {
        let mut engine = engine(GameConfig {
            walls_enabled: false,
            ..GameConfig::small()
        });
        let mut state = engine.new_game();
        put_food(&mut state, Cell::new(0, 5));
        state.snake = Snake::new(Cell::new(8, 0), 1, Direction::Right);
        engine.steer(&mut state, Direction::Right);

        let outcome = engine.tick(&mut state);

        assert!(!outcome.terminated());
        assert_eq!(state.snake.head(), Cell::new(-8, 0));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        put_food(&mut state, Cell::new(8, 8));
        // (5,5) (4,5) (3,5) (2,5) (1,5), heading right
        state.snake = Snake::new(Cell::new(5, 5), 5, Direction::Right);
        engine.steer(&mut state, Direction::Right);

        engine.tick(&mut state);
        engine.steer(&mut state, Direction::Down);
        engine.tick(&mut state);
        engine.steer(&mut state, Direction::Left);
        engine.tick(&mut state);
        engine.steer(&mut state, Direction::Up);
        let outcome = engine.tick(&mut state);

        assert!(outcome.terminated());
        assert_eq!(outcome.collision, Collision::SelfCollision);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        engine.steer(&mut state, Direction::Right);

        assert!(!engine.steer(&mut state, Direction::Left));
        assert_eq!(state.heading, Some(Direction::Right));
    }

    #[test]
    fn test_turns_while_paused_cannot_reverse_into_neck() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        put_food(&mut state, Cell::new(8, 8));
        state.snake = Snake::from_cells([Cell::new(0, 0), Cell::new(-1, 0), Cell::new(-2, 0)])
            .unwrap();
        engine.steer(&mut state, Direction::Right);
        engine.tick(&mut state);
        assert_eq!(state.snake.head(), Cell::new(1, 0));

        engine.toggle_pause(&mut state);
        assert!(engine.steer(&mut state, Direction::Up));
        engine.tick(&mut state);
        // Still travelling right, so left is a reversal
        assert!(!engine.steer(&mut state, Direction::Left));
        engine.tick(&mut state);
        assert_eq!(state.heading, Some(Direction::Up));

        engine.toggle_pause(&mut state);
        let outcome = engine.tick(&mut state);
        assert_eq!(outcome.collision, Collision::Clear);
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.snake.head(), Cell::new(1, 1));
    }

    #[test]
    fn test_first_direction_cannot_enter_neck() {
        let mut engine = engine(GameConfig {
            initial_snake_length: 3,
            ..GameConfig::small()
        });
        let mut state = engine.new_game();

        assert!(!engine.steer(&mut state, Direction::Down));
        assert_eq!(state.heading, None);
        assert!(engine.steer(&mut state, Direction::Left));
    }

    #[test]
    fn test_pause_freezes_ticks() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        engine.steer(&mut state, Direction::Up);
        engine.toggle_pause(&mut state);
        assert_eq!(state.phase, Phase::Paused);

        let outcome = engine.tick(&mut state);
        assert!(!outcome.moved);
        assert_eq!(state.snake.head(), Cell::ORIGIN);

        engine.toggle_pause(&mut state);
        assert_eq!(state.phase, Phase::Running);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        state.phase = Phase::Over;
        let ticks_before = state.ticks;

        let outcome = engine.tick(&mut state);
        engine.toggle_pause(&mut state);

        assert!(!outcome.moved);
        assert_eq!(state.ticks, ticks_before);
        assert_eq!(state.phase, Phase::Over);
        assert!(!engine.steer(&mut state, Direction::Up));
    }

    #[test]
    fn test_restart_keeps_high_score() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        state.score = 90;
        state.high_score = 90;
        state.level = 3;
        state.step_delay = Duration::from_millis(50);
        state.phase = Phase::Over;

        engine.restart(&mut state);

        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 90);
        assert_eq!(state.level, 1);
        assert_eq!(state.step_delay, Duration::from_millis(120));
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.heading, None);
        assert!(state.active_power_up().is_none());
        assert!(state.food.is_some());
    }

    #[test]
    fn test_level_up_reduces_delay() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        state.level_progress = 4;

        assert!(engine.advance_level(&mut state));
        assert_eq!(state.level_progress, 0);
        assert_eq!(state.level, 2);
        assert_eq!(state.step_delay, Duration::from_millis(115));
    }

    #[test]
    fn test_level_up_clamps_at_floor() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.new_game();
        state.step_delay = Duration::from_millis(32);
        state.level_progress = 4;

        engine.advance_level(&mut state);
        assert_eq!(state.step_delay, Duration::from_millis(30));

        state.level_progress = 4;
        engine.advance_level(&mut state);
        assert_eq!(state.step_delay, Duration::from_millis(30));
    }
}
