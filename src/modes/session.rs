use std::time::Duration;

use anyhow::Result;
use log::info;

use crate::game::{Command, GameConfig, GameEngine, GameState, Snapshot, TickOutcome};
use crate::input::InputBuffer;
use crate::metrics::GameMetrics;
use crate::render::RenderSink;

/// Whether the driver should keep scheduling ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One game session: engine, state and buffered input, drawn into `S`
///
/// Input may arrive at any time through [`Session::submit`]; it only takes
/// effect at the next [`Session::tick_boundary`].
pub struct Session<S: RenderSink> {
    engine: GameEngine,
    state: GameState,
    input: InputBuffer,
    metrics: GameMetrics,
    sink: S,
}

impl<S: RenderSink> Session<S> {
    pub fn new(config: GameConfig, sink: S) -> Result<Self> {
        let mut engine = GameEngine::new(config)?;
        let state = engine.new_game();

        Ok(Self {
            engine,
            state,
            input: InputBuffer::new(),
            metrics: GameMetrics::new(),
            sink,
        })
    }

    pub fn submit(&mut self, command: Command) {
        self.input.push(command);
    }

    /// Apply buffered input, run one tick and draw the result
    pub fn tick_boundary(&mut self) -> Result<Flow> {
        let pending = self.input.drain();

        for control in pending.controls {
            match control {
                Command::Pause => self.engine.toggle_pause(&mut self.state),
                Command::Restart => {
                    self.engine.restart(&mut self.state);
                    self.metrics.on_game_start();
                }
                Command::Quit => {
                    info!("quit requested after {} ticks", self.state.ticks);
                    return Ok(Flow::Quit);
                }
                Command::Move(_) => {}
            }
        }

        if let Some(direction) = pending.direction {
            self.engine.steer(&mut self.state, direction);
        }

        let outcome = self.engine.tick(&mut self.state);
        self.on_tick(&outcome);
        self.draw()?;

        Ok(Flow::Continue)
    }

    /// Draw the current state without ticking
    pub fn draw(&mut self) -> Result<()> {
        self.metrics.update();
        let snapshot = self.engine.snapshot(&self.state);
        self.sink.render(&snapshot, &self.metrics)
    }

    /// How long the driver waits before the next boundary
    pub fn step_delay(&self) -> Duration {
        self.state.step_delay
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot(&self.state)
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn on_tick(&mut self, outcome: &TickOutcome) {
        self.metrics.record_tick(outcome, &self.state);
    }
}
