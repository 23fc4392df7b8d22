use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::formatting::{avatar_lines, centered_rect, thumbnail_line};
use super::hitmap::{HitMap, Target};
use super::projection::project_modal;
use super::theme::get_theme_colors;
use crate::app::App;
use crate::avatar::AVATAR_SIZE;

pub const CLOSE_LABEL: &str = "[x]";

/// Rows taken by a rendered avatar (two pixel rows per cell)
const AVATAR_ROWS: u16 = ((AVATAR_SIZE + 1) / 2) as u16;

/// Render the post modal over a dimmed backdrop and register its click targets
pub fn render_modal(frame: &mut Frame, app: &App, area: Rect, hit_map: &mut HitMap) {
    let Some(modal) = project_modal(&app.view) else {
        return;
    };
    let theme = get_theme_colors(app.color_scheme);

    frame
        .buffer_mut()
        .set_style(area, Style::default().add_modifier(Modifier::DIM));
    hit_map.push(area, Target::Backdrop);

    let modal_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, modal_area);

    let title = if modal.zoomed { " Post · expanded " } else { " Post " };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);
    hit_map.push(modal_area, Target::ModalBody);

    // Close control sits on the top border, right-aligned
    let close_area = Rect::new(
        modal_area.right().saturating_sub(CLOSE_LABEL.len() as u16 + 2),
        modal_area.y,
        CLOSE_LABEL.len() as u16,
        1,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            CLOSE_LABEL,
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        close_area,
    );
    hit_map.push(close_area, Target::ModalClose);

    let author_height = match (modal.author_name, modal.avatar) {
        (Some(_), Some(_)) => AVATAR_ROWS,
        (Some(_), None) => 1,
        (None, _) => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(author_height)])
        .split(inner);

    let body = vec![
        thumbnail_line(modal.thumbnail, modal.zoomed, &theme, inner.width as usize),
        Line::from(""),
        Line::from(Span::styled(
            modal.title.to_string(),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ]
    .into_iter()
    .chain(
        modal
            .content
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.text)))),
    )
    .collect::<Vec<_>>();

    frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), chunks[0]);

    let Some(author_name) = modal.author_name else {
        return;
    };
    let name = Span::styled(
        author_name.to_string(),
        Style::default().fg(theme.secondary).add_modifier(Modifier::BOLD),
    );

    match modal.avatar {
        Some(avatar) => {
            let author_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(AVATAR_SIZE as u16 + 1), Constraint::Min(0)])
                .split(chunks[1]);
            frame.render_widget(
                Paragraph::new(avatar_lines(avatar, theme.background)),
                author_chunks[0],
            );
            frame.render_widget(Paragraph::new(Line::from(name)), author_chunks[1]);
        }
        None => {
            frame.render_widget(Paragraph::new(Line::from(name)), chunks[1]);
        }
    }
}
