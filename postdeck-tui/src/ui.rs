// UI module - split into cohesive submodules for maintainability
pub mod theme;
pub mod formatting;
pub mod hitmap;
pub mod projection;
mod cards;
mod modal;

pub use cards::{grid_columns, CARD_HEIGHT, LEARN_MORE_LABEL};
pub use modal::CLOSE_LABEL;

// Re-export main render function
pub use self::render_main::render;

// Main render logic
mod render_main {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Clear, Paragraph},
        Frame,
    };

    use super::cards::render_grid;
    use super::hitmap::HitMap;
    use super::modal::render_modal;
    use super::theme::{get_theme_colors, ThemeColors};
    use crate::app::{App, LoadStatus, Phase};

    pub const MIN_WIDTH: u16 = 40;
    pub const MIN_HEIGHT: u16 = 14;

    /// Render the UI and replace the app's hit map with this frame's targets
    pub fn render(frame: &mut Frame, app: &mut App) {
        let area = frame.area();

        let theme = get_theme_colors(app.color_scheme);

        frame.render_widget(Clear, area);

        let background = Block::default().style(Style::default().bg(theme.background));
        frame.render_widget(background, area);

        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let warning = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Terminal Too Small",
                    Style::default()
                        .fg(theme.error)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Minimum size: {}x{}", MIN_WIDTH, MIN_HEIGHT),
                    Style::default().fg(theme.text),
                )),
                Line::from(Span::styled(
                    format!("Current size: {}x{}", area.width, area.height),
                    Style::default().fg(theme.warning),
                )),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.error)),
            );

            frame.render_widget(warning, area);
            app.hit_map = HitMap::default();
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let mut hit_map = HitMap::default();

        frame.render_widget(header(app, &theme), chunks[0]);
        render_grid(frame, app, chunks[1], &mut hit_map);
        frame.render_widget(footer(app.view.phase(), &theme), chunks[2]);

        if app.view.modal_visible() {
            render_modal(frame, app, area, &mut hit_map);
        }

        app.hit_map = hit_map;
    }

    fn header(app: &App, theme: &ThemeColors) -> Paragraph<'static> {
        let status = match app.view.load_status() {
            LoadStatus::NotStarted | LoadStatus::Loading => "loading…".to_string(),
            LoadStatus::Loaded | LoadStatus::Failed(_) => {
                let count = app.view.posts().len();
                format!("{} {}", count, if count == 1 { "post" } else { "posts" })
            }
        };

        Paragraph::new(Line::from(vec![
            Span::styled(
                " postdeck ",
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("· {}", status), Style::default().fg(theme.text_dim)),
        ]))
    }

    fn footer(phase: Phase, theme: &ThemeColors) -> Paragraph<'static> {
        let hints: &[(&str, &str)] = match phase {
            Phase::Idle => &[
                ("←↑↓→", "move"),
                ("Enter", "open"),
                ("m", "learn more"),
                ("q", "quit"),
            ],
            Phase::Viewing => &[("Esc", "close"), ("m", "learn more"), ("click outside", "close")],
            Phase::Expanded => &[("Esc", "close"), ("click outside", "close")],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, action)| {
                [
                    Span::styled(
                        format!(" {}", key),
                        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!(": {} ", action), Style::default().fg(theme.text_dim)),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans))
    }
}
