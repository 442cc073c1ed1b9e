//! Core game logic module for Snake Xenia
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Callers own the [`GameState`] and pass it to the [`GameEngine`] for every operation.

pub mod action;
pub mod collision;
pub mod config;
pub mod engine;
pub mod grid;
pub mod snake;
pub mod snapshot;
pub mod spawner;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use collision::Collision;
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, TickOutcome};
pub use grid::Grid;
pub use snake::Snake;
pub use snapshot::Snapshot;
pub use spawner::{Placement, SpawnFallback, Spawner};
pub use state::{Cell, CollisionType, Consumable, ConsumableKind, GameState, Phase};
