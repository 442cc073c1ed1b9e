use std::io::Stderr;

use anyhow::{Context, Result};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::RenderSink;
use crate::game::{Cell, CollisionType, ConsumableKind, Phase, Snapshot};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if snapshot.phase == Phase::Over {
            let game_over = self.render_game_over(snapshot);
            frame.render_widget(game_over, game_area);
        } else {
            let grid = self.render_grid(game_area, snapshot);
            frame.render_widget(grid, game_area);
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, _area: Rect, snapshot: &Snapshot) -> Paragraph<'_> {
        let (max_x, max_y) = snapshot.max_cell;
        let mut lines = Vec::new();

        // Up is +y, so the top row is the largest y
        for y in (-max_y..=max_y).rev() {
            let mut spans = Vec::new();

            for x in -max_x..=max_x {
                let cell = Cell::new(x, y);

                let span = if Some(cell) == snapshot.head() {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(&cell) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if let Some(consumable) = snapshot.consumable_at(cell) {
                    match consumable.kind {
                        ConsumableKind::Food => Span::styled(
                            "● ",
                            Style::default()
                                .fg(Color::LightRed)
                                .add_modifier(Modifier::BOLD),
                        ),
                        ConsumableKind::PowerUp => Span::styled(
                            "◆ ",
                            Style::default()
                                .fg(Color::Magenta)
                                .add_modifier(Modifier::BOLD),
                        ),
                    }
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        let title = if snapshot.phase == Phase::Paused {
            " Snake Xenia - PAUSED "
        } else {
            " Snake Xenia "
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Yellow));
        let value = |text: String| Span::styled(text, Style::default().fg(Color::White));

        let text = vec![
            Line::from(vec![
                label("Score: "),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                label("High Score: "),
                value(snapshot.high_score.to_string()),
                Span::raw("    "),
                label("Time: "),
                value(metrics.clock()),
            ]),
            Line::from(vec![
                label("Level: "),
                value(snapshot.level.to_string()),
                Span::raw("    "),
                label("Progress: "),
                value(format!(
                    "{}/{}",
                    snapshot.level_progress, snapshot.level_up_threshold
                )),
                Span::raw("    "),
                label("Speed: "),
                value(format!("{:.1} steps/sec", snapshot.steps_per_second())),
            ]),
            Line::from(vec![
                label("Games: "),
                value(metrics.games_played.to_string()),
                Span::raw("    "),
                label("Longest: "),
                value(metrics.longest_snake.to_string()),
                Span::raw("    "),
                label("Best Level: "),
                value(metrics.best_level.to_string()),
                Span::raw("    "),
                label("Eaten: "),
                value(metrics.consumables_eaten.to_string()),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let cause = match snapshot.game_over {
            Some(CollisionType::Wall) => "Hit wall",
            Some(CollisionType::SelfCollision) => "Self collision",
            None => "",
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                format!("GAME OVER ({cause})"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Yellow)),
            Span::raw(" pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render sink drawing into the alternate screen
pub struct TerminalSink {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    renderer: Renderer,
}

impl TerminalSink {
    pub fn new(terminal: Terminal<CrosstermBackend<Stderr>>) -> Self {
        Self {
            terminal,
            renderer: Renderer::new(),
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stderr>> {
        &mut self.terminal
    }
}

impl RenderSink for TerminalSink {
    fn render(&mut self, snapshot: &Snapshot, metrics: &GameMetrics) -> Result<()> {
        let renderer = &self.renderer;
        self.terminal
            .draw(|frame| renderer.render(frame, snapshot, metrics))
            .context("Failed to draw frame")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::backend::TestBackend;

    use super::*;
    use crate::game::{GameConfig, GameEngine};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn draw(snapshot: &Snapshot) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let metrics = GameMetrics::new();
        terminal
            .draw(|frame| Renderer::new().render(frame, snapshot, &metrics))
            .unwrap();
        buffer_text(&terminal)
    }

    fn snapshot() -> Snapshot {
        let mut engine = GameEngine::new(GameConfig {
            seed: Some(3),
            ..GameConfig::cells(6)
        })
        .unwrap();
        let state = engine.new_game();
        engine.snapshot(&state)
    }

    #[test]
    fn test_running_board_shows_stats() {
        let text = draw(&snapshot());
        assert!(text.contains("Snake Xenia"));
        assert!(text.contains("Score:"));
        assert!(text.contains("Level:"));
        assert!(text.contains("Longest:"));
        assert!(text.contains("Best Level:"));
        assert!(text.contains("■"));
        assert!(text.contains("●"));
    }

    #[test]
    fn test_paused_title() {
        let mut snapshot = snapshot();
        snapshot.phase = Phase::Paused;
        assert!(draw(&snapshot).contains("PAUSED"));
    }

    #[test]
    fn test_game_over_panel() {
        let mut snapshot = snapshot();
        snapshot.phase = Phase::Over;
        snapshot.game_over = Some(CollisionType::Wall);
        snapshot.step_delay = Duration::from_millis(100);
        let text = draw(&snapshot);
        assert!(text.contains("GAME OVER (Hit wall)"));
        assert!(!text.contains("■"));
    }
}
