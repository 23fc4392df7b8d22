use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::formatting::{thumbnail_line, truncate_to_width, wrap_truncated};
use super::hitmap::{HitMap, Target};
use super::projection::{project_cards, CardView};
use super::theme::{get_theme_colors, ThemeColors};
use crate::app::{App, LoadStatus};
use crate::log_rendering;

pub const CARD_MIN_WIDTH: u16 = 34;
pub const CARD_HEIGHT: u16 = 11;
pub const MAX_COLUMNS: usize = 3;
pub const LEARN_MORE_LABEL: &str = "[ Learn more ]";

/// Number of card columns that fit in `width`
pub fn grid_columns(width: u16) -> usize {
    ((width / CARD_MIN_WIDTH) as usize).clamp(1, MAX_COLUMNS)
}

/// Render the card grid and register card and learn-more click targets
pub fn render_grid(frame: &mut Frame, app: &mut App, area: Rect, hit_map: &mut HitMap) {
    let theme = get_theme_colors(app.color_scheme);
    let cards = project_cards(&app.view);

    if cards.is_empty() {
        render_empty_grid(frame, app.view.load_status(), area, &theme);
        return;
    }

    let columns = grid_columns(area.width);
    let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);
    app.grid.ensure_visible(columns, visible_rows);
    let scroll_row = app.grid.scroll_row;

    log_rendering!(
        app.log_config,
        "render_grid: cards={}, columns={}, scroll_row={}",
        cards.len(),
        columns,
        scroll_row
    );

    let column_width = area.width / columns as u16;

    for (index, card) in cards.iter().enumerate() {
        let row = index / columns;
        if row < scroll_row || row >= scroll_row + visible_rows {
            continue;
        }
        let column = index % columns;

        let x = area.x + column as u16 * column_width;
        let width = if column == columns - 1 {
            area.width - column as u16 * column_width
        } else {
            column_width
        };
        let y = area.y + (row - scroll_row) as u16 * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
        let card_area = Rect::new(x, y, width, height);

        let button = render_card(frame, card, card_area, index == app.grid.focused, &theme);

        hit_map.push(card_area, Target::Card(card.post_id));
        if let Some(button) = button {
            hit_map.push(button, Target::LearnMore(card.post_id));
        }
    }
}

/// Draw one card; returns the learn-more button's area when it fits
fn render_card(
    frame: &mut Frame,
    card: &CardView<'_>,
    area: Rect,
    focused: bool,
    theme: &ThemeColors,
) -> Option<Rect> {
    let border_style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.border)
    };
    let title_width = area.width.saturating_sub(4) as usize;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            format!(" {} ", truncate_to_width(card.title, title_width.saturating_sub(2))),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(if focused { theme.highlight_bg } else { theme.background }));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return None;
    }

    let width = inner.width as usize;
    let mut lines = vec![thumbnail_line(card.thumbnail, card.zoomed, theme, width)];

    let footer_lines = card.author_line.is_some() as usize + card.date.is_some() as usize;
    // Thumbnail and button rows are always reserved
    let content_budget = (inner.height as usize).saturating_sub(2 + footer_lines);
    lines.extend(
        wrap_truncated(card.content, width, content_budget)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.text)))),
    );

    if let Some(author_line) = &card.author_line {
        lines.push(Line::from(Span::styled(
            truncate_to_width(author_line, width),
            Style::default().fg(theme.secondary),
        )));
    }
    if let Some(date) = &card.date {
        lines.push(Line::from(Span::styled(
            date.clone(),
            Style::default().fg(theme.text_dim),
        )));
    }

    let body_area = Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(1));
    frame.render_widget(Paragraph::new(lines), body_area);

    if inner.height < 2 {
        return None;
    }

    let label_width = (LEARN_MORE_LABEL.width() as u16).min(inner.width);
    let button = Rect::new(inner.x, inner.bottom() - 1, label_width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(
            LEARN_MORE_LABEL,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        button,
    );

    Some(button)
}

fn render_empty_grid(frame: &mut Frame, status: &LoadStatus, area: Rect, theme: &ThemeColors) {
    let message = match status {
        LoadStatus::NotStarted | LoadStatus::Loading => {
            Span::styled("⏳ Loading posts...", Style::default().fg(theme.text))
        }
        LoadStatus::Loaded | LoadStatus::Failed(_) => Span::styled(
            "No posts to show",
            Style::default().fg(theme.text_dim),
        ),
    };

    let placeholder = Paragraph::new(vec![Line::from(""), Line::from(message)])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
    frame.render_widget(placeholder, area);
}
