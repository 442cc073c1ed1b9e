pub mod renderer;

use anyhow::Result;

use crate::game::Snapshot;
use crate::metrics::GameMetrics;

pub use renderer::{Renderer, TerminalSink};

/// Anything that can show a finished tick
///
/// The session calls `render` exactly once per tick boundary, after the tick
/// has been fully applied.
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot, metrics: &GameMetrics) -> Result<()>;
}
