use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{CollisionType, Difficulty, GameState, Phase, Position};
use crate::metrics::SessionStats;
use crate::persistence::{LeaderboardEntry, Theme};

/// What occupies a grid cell, in drawing priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Head,
    Body,
    Food,
    Empty,
}

pub fn cell_kind(state: &GameState, pos: Position) -> CellKind {
    if pos == state.snake.head() {
        CellKind::Head
    } else if state.snake.occupies(pos) {
        CellKind::Body
    } else if pos == state.food {
        CellKind::Food
    } else {
        CellKind::Empty
    }
}

/// Colours for one theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub accent: Color,
    pub head: Color,
    pub body: Color,
    pub food: Color,
    pub empty: Color,
    pub border: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color::White,
                text: Color::Black,
                accent: Color::Blue,
                head: Color::Rgb(46, 125, 50),
                body: Color::Rgb(76, 175, 80),
                food: Color::Red,
                empty: Color::Gray,
                border: Color::Black,
            },
            Theme::Dark => Self {
                background: Color::Black,
                text: Color::White,
                accent: Color::Yellow,
                head: Color::Cyan,
                body: Color::Green,
                food: Color::LightRed,
                empty: Color::DarkGray,
                border: Color::White,
            },
        }
    }
}

/// Everything one frame shows
pub struct View<'a> {
    pub state: &'a GameState,
    pub difficulty: Difficulty,
    pub stats: &'a SessionStats,
    pub leaderboard: &'a [LeaderboardEntry],
    pub theme: Theme,
    /// Name typed so far, when a qualifying score is being entered
    pub name_prompt: Option<&'a str>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &View) {
        let palette = Palette::for_theme(view.theme);
        let base = Style::default().bg(palette.background).fg(palette.text);
        frame.render_widget(Block::default().style(base), frame.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(view, &palette), chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(32)])
            .split(chunks[1]);

        let grid_area = body[0];
        frame.render_widget(self.render_grid(view.state, &palette), grid_area);
        frame.render_widget(self.render_leaderboard(view.leaderboard, &palette), body[1]);

        match view.state.phase {
            Phase::Ready => {
                let area = centered_rect(grid_area, 36, 5);
                frame.render_widget(Clear, area);
                frame.render_widget(self.render_ready(&palette), area);
            }
            Phase::GameOver => {
                let area = centered_rect(grid_area, 36, 7);
                frame.render_widget(Clear, area);
                frame.render_widget(self.render_game_over(view.state, &palette), area);
            }
            Phase::Running => {}
        }

        if let Some(name) = view.name_prompt {
            let area = centered_rect(frame.area(), 40, 7);
            frame.render_widget(Clear, area);
            frame.render_widget(self.render_name_prompt(name, view.state.score, &palette), area);
        }

        frame.render_widget(self.render_controls(&palette), chunks[2]);
    }

    fn render_grid(&self, state: &GameState, palette: &Palette) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = match cell_kind(state, pos) {
                    CellKind::Head => Span::styled(
                        "■ ",
                        Style::default().fg(palette.head).add_modifier(Modifier::BOLD),
                    ),
                    CellKind::Body => Span::styled("□ ", Style::default().fg(palette.body)),
                    CellKind::Food => Span::styled(
                        "O ",
                        Style::default().fg(palette.food).add_modifier(Modifier::BOLD),
                    ),
                    CellKind::Empty => Span::styled(". ", Style::default().fg(palette.empty)),
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(palette.border))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, view: &View, palette: &Palette) -> Paragraph<'_> {
        let label = Style::default().fg(palette.accent);
        let value = Style::default().fg(palette.text).add_modifier(Modifier::BOLD);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(view.state.score.to_string(), value),
            Span::raw("   "),
            Span::styled("Best: ", label),
            Span::styled(view.stats.best_score.max(view.state.score).to_string(), value),
            Span::raw("   "),
            Span::styled("Level: ", label),
            Span::styled(view.difficulty.label(), value),
            Span::raw("   "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", view.state.speed), value),
            Span::raw("   "),
            Span::styled("Food: ", label),
            Span::styled(view.stats.foods_eaten.to_string(), value),
            Span::raw("   "),
            Span::styled("Time: ", label),
            Span::styled(view.stats.format_time(), value),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_leaderboard<'a>(
        &self,
        entries: &'a [LeaderboardEntry],
        palette: &Palette,
    ) -> Paragraph<'a> {
        let mut lines = Vec::with_capacity(entries.len().max(1));

        if entries.is_empty() {
            lines.push(Line::from(Span::styled(
                "No scores yet",
                Style::default().fg(palette.empty),
            )));
        }

        for (rank, entry) in entries.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("{:>2}. ", rank + 1), Style::default().fg(palette.accent)),
                Span::styled(format!("{:<16}", entry.name), Style::default().fg(palette.text)),
                Span::styled(
                    format!("{:>5}", entry.score),
                    Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {}", &entry.difficulty.label()[..1]),
                    Style::default().fg(palette.empty),
                ),
            ]));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(" Leaderboard "),
        )
    }

    fn render_ready(&self, palette: &Palette) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(palette.text)),
                Span::styled(
                    "Space",
                    Style::default().fg(palette.head).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(palette.text)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        )
    }

    fn render_game_over(&self, state: &GameState, palette: &Palette) -> Paragraph<'_> {
        let reason = match state.collision {
            Some(CollisionType::Wall) => "hit the wall",
            Some(CollisionType::SelfCollision) => "ran into itself",
            None => "",
        };

        let text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(palette.food).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(palette.empty))),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(palette.accent)),
                Span::styled(
                    state.score.to_string(),
                    Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Space", Style::default().fg(palette.head).add_modifier(Modifier::BOLD)),
                Span::styled(" to restart, ", Style::default().fg(palette.text)),
                Span::styled("Q", Style::default().fg(palette.food).add_modifier(Modifier::BOLD)),
                Span::styled(" to quit", Style::default().fg(palette.text)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.food)),
        )
    }

    fn render_name_prompt<'a>(&self, name: &'a str, score: u32, palette: &Palette) -> Paragraph<'a> {
        let text = vec![
            Line::from(Span::styled(
                format!("New high score: {score}"),
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Name: ", Style::default().fg(palette.text)),
                Span::styled(name, Style::default().fg(palette.head).add_modifier(Modifier::BOLD)),
                Span::styled("_", Style::default().fg(palette.text)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to save, Esc to skip",
                Style::default().fg(palette.empty),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.accent)),
        )
    }

    fn render_controls(&self, palette: &Palette) -> Paragraph<'_> {
        let key = Style::default().fg(palette.accent);
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", key),
            Span::raw(" or "),
            Span::styled("WASD", key),
            Span::raw(" move | "),
            Span::styled("Space", key),
            Span::raw(" start | "),
            Span::styled("1-3/C", key),
            Span::raw(" level | "),
            Span::styled("T", key),
            Span::raw(" theme | "),
            Span::styled("Q", Style::default().fg(palette.food)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Snake};
    use ratatui::{Terminal, backend::TestBackend};

    fn sample_state() -> GameState {
        let snake = Snake::from_segments(
            vec![Position::new(2, 1), Position::new(1, 1)],
            Direction::Right,
        );
        GameState::new(snake, Position::new(4, 4), 10, 10, 150)
    }

    fn draw(view: &View) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, view))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_cell_kinds() {
        let state = sample_state();
        assert_eq!(cell_kind(&state, Position::new(2, 1)), CellKind::Head);
        assert_eq!(cell_kind(&state, Position::new(1, 1)), CellKind::Body);
        assert_eq!(cell_kind(&state, Position::new(4, 4)), CellKind::Food);
        assert_eq!(cell_kind(&state, Position::new(0, 0)), CellKind::Empty);
    }

    #[test]
    fn test_renders_game_over_marker() {
        let mut state = sample_state();
        state.phase = Phase::GameOver;
        state.collision = Some(CollisionType::Wall);
        state.score = 30;
        let stats = SessionStats::default();
        let view = View {
            state: &state,
            difficulty: Difficulty::Easy,
            stats: &stats,
            leaderboard: &[],
            theme: Theme::Dark,
            name_prompt: None,
        };

        let screen = draw(&view);

        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("hit the wall"));
        assert!(screen.contains("No scores yet"));
    }

    #[test]
    fn test_renders_leaderboard_and_prompt() {
        let mut state = sample_state();
        state.phase = Phase::Running;
        let stats = SessionStats::default();
        let entries = vec![LeaderboardEntry::new("ada", 120, Difficulty::Hard)];
        let view = View {
            state: &state,
            difficulty: Difficulty::Hard,
            stats: &stats,
            leaderboard: &entries,
            theme: Theme::Light,
            name_prompt: Some("bo"),
        };

        let screen = draw(&view);

        assert!(screen.contains("ada"));
        assert!(screen.contains("120"));
        assert!(screen.contains("Name: bo"));
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_header_shows_foods_eaten() {
        let mut state = sample_state();
        state.phase = Phase::Running;
        state.score = 30;
        let mut stats = SessionStats::new(50);
        stats.foods_eaten = 3;
        let view = View {
            state: &state,
            difficulty: Difficulty::Normal,
            stats: &stats,
            leaderboard: &[],
            theme: Theme::Light,
            name_prompt: None,
        };

        let screen = draw(&view);

        assert!(screen.contains("Score: 30"));
        assert!(screen.contains("Best: 50"));
        assert!(screen.contains("Food: 3"));
        assert!(screen.contains("Level: Normal"));
    }

    #[test]
    fn test_centered_rect_fits() {
        let area = Rect::new(0, 0, 20, 4);
        let rect = centered_rect(area, 36, 7);
        assert_eq!(rect, Rect::new(0, 0, 20, 4));

        let rect = centered_rect(Rect::new(10, 10, 40, 20), 20, 10);
        assert_eq!(rect, Rect::new(20, 15, 20, 10));
    }
}
