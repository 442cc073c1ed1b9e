//! Snake Xenia - a grid snake game with a power-up and a speed curve
//!
//! This library provides:
//! - Core game logic (game module), free of I/O
//! - Terminal input mapping and per-tick input buffering (input module)
//! - TUI rendering behind a render sink trait (render module)
//! - Session counters (metrics module)
//! - The tick-boundary session and the keyboard mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
