use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Outcome, Position, SessionState, Snapshot};
use crate::metrics::GameMetrics;
use crate::render::theme::Theme;

/// Static facts about the running game shown on the menu and HUD
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub title: &'static str,
    pub board: String,
    pub speed: String,
    pub ticking: &'static str,
}

pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        info: &SessionInfo,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
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

        match snapshot.state {
            SessionState::Menu => {
                frame.render_widget(self.render_menu(info, metrics), game_area);
            }
            SessionState::Active | SessionState::Paused => {
                frame.render_widget(self.render_grid(snapshot, info), game_area);
            }
            SessionState::Ended(outcome) => {
                frame.render_widget(self.render_game_over(outcome, snapshot), game_area);
            }
        }

        let controls = self.render_controls(chunks[2], snapshot.state);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot, info: &SessionInfo) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(snapshot.rows);

        for y in 0..snapshot.rows {
            let mut spans = Vec::with_capacity(snapshot.cols);

            for x in 0..snapshot.cols {
                let pos = Position::new(x as i32, y as i32);
                let segment = snapshot.snake.iter().position(|cell| *cell == pos);

                let cell = match segment {
                    Some(0) => Span::styled(
                        "■ ",
                        Style::default()
                            .fg(self.theme.head_color(snapshot.ticks))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Some(index) => Span::styled(
                        "□ ",
                        Style::default().fg(self.theme.segment_color(index, snapshot.ticks)),
                    ),
                    None if snapshot.food == Some(pos) => Span::styled(
                        self.theme.food_glyph(snapshot.score),
                        Style::default()
                            .fg(self.theme.food_color())
                            .add_modifier(Modifier::BOLD),
                    ),
                    None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = if snapshot.state == SessionState::Paused {
            format!(" {} - PAUSED ", info.title)
        } else {
            format!(" {} ", info.title)
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(self.theme.border_color()))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Last: ", label),
            Span::styled(metrics.last_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ];
        if snapshot.state == SessionState::Paused {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_menu(&self, info: &SessionInfo, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                info.title,
                Style::default()
                    .fg(self.theme.border_color())
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Board: ", label),
                Span::styled(info.board.clone(), value),
            ]),
            Line::from(vec![
                Span::styled("Speed: ", label),
                Span::styled(info.speed.clone(), value),
            ]),
            Line::from(vec![
                Span::styled("Ticks: ", label),
                Span::styled(info.ticking, value),
            ]),
            Line::from(vec![
                Span::styled("Games this run: ", label),
                Span::styled(metrics.games_played.to_string(), value),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.border_color())),
        )
    }

    fn render_game_over(&self, outcome: Outcome, snapshot: &Snapshot) -> Paragraph<'_> {
        let (title, color) = match outcome {
            Outcome::Win => ("VICTORY!", Color::Green),
            Outcome::Lose(_) => ("GAME OVER", Color::Red),
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
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
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to retry, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "H",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for the menu or ", Style::default().fg(Color::Gray)),
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
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self, _area: Rect, state: SessionState) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" / drag to move | "),
        ];
        if matches!(state, SessionState::Active | SessionState::Paused) {
            spans.push(Span::styled("Space", Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(" pause | "));
        }
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }
}
