use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::stderr;
use tokio::time::{Instant, sleep_until};

use super::session::{Flow, Session};
use crate::game::{Command, GameConfig};
use crate::input::InputHandler;
use crate::render::{RenderSink, TerminalSink};

/// Keyboard play in the terminal
pub struct HumanMode {
    config: GameConfig,
    input_handler: InputHandler,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            input_handler: InputHandler::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Reject a bad configuration before touching the terminal
        self.config.validate().context("Invalid game configuration")?;

        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let mut session = Session::new(self.config.clone(), TerminalSink::new(terminal))?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut session).await;

        // Cleanup terminal
        Self::cleanup_terminal(session.sink_mut())?;

        result
    }

    async fn run_game_loop(&mut self, session: &mut Session<TerminalSink>) -> Result<()> {
        let mut event_stream = EventStream::new();
        session.draw()?;

        let mut next_tick = Instant::now() + session.step_delay();
        let mut input_open = true;

        loop {
            tokio::select! {
                // Input is buffered; the session applies it at the next tick
                maybe_event = event_stream.next(), if input_open => {
                    input_open = self.on_input(session, maybe_event);
                }

                _ = sleep_until(next_tick) => {
                    if session.tick_boundary()? == Flow::Quit {
                        break;
                    }
                    // The delay may have shrunk on a level-up
                    next_tick = Instant::now() + session.step_delay();
                }

                _ = tokio::signal::ctrl_c() => {
                    session.submit(Command::Quit);
                }
            }
        }

        info!("session ended, high score {}", session.state().high_score);
        Ok(())
    }

    /// Buffer one item from the event stream; returns false once the stream
    /// has ended and must not be polled again
    fn on_input<S: RenderSink>(
        &self,
        session: &mut Session<S>,
        maybe_event: Option<std::io::Result<Event>>,
    ) -> bool {
        match maybe_event {
            Some(Ok(event)) => self.handle_event(session, event),
            Some(Err(err)) => warn!("failed to read terminal event: {}", err),
            None => {
                warn!("terminal input closed");
                return false;
            }
        }
        true
    }

    fn handle_event<S: RenderSink>(&self, session: &mut Session<S>, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            if let Some(command) = self.input_handler.handle_key_event(key) {
                session.submit(command);
            }
        }
    }

    fn cleanup_terminal(sink: &mut TerminalSink) -> Result<()> {
        let terminal = sink.terminal_mut();
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
