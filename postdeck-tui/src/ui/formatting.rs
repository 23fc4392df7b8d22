use std::fmt::Display;

use chrono::{Local, TimeZone};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::ThemeColors;
use crate::avatar::AvatarHandle;

/// Format an epoch-seconds date as a calendar date in the viewer's time zone
pub fn format_epoch_date(secs: i64) -> Option<String> {
    format_epoch_date_in(secs, &Local)
}

/// Format an epoch-seconds date as e.g. `Tue Nov 14 2023` in `tz`
pub fn format_epoch_date_in<Tz>(secs: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%a %b %d %Y").to_string())
}

/// Cut `text` to at most `max_width` columns, marking the cut with an ellipsis
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > max_width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}

/// Wrap `text` to `width` columns, keeping at most `max_lines` lines
pub fn wrap_truncated(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }

    let width = width.max(1);
    let mut lines: Vec<String> = text
        .lines()
        .flat_map(|line| {
            textwrap::wrap(line, width)
                .into_iter()
                .map(|l| l.into_owned())
                .collect::<Vec<_>>()
        })
        .collect();

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let marked = format!("{}…", last.trim_end());
            *last = truncate_to_width(&marked, width);
        }
    }

    lines
}

/// Thumbnail reference line; the zoomed variant is enlarged and highlighted
pub fn thumbnail_line(url: &str, zoomed: bool, theme: &ThemeColors, max_width: usize) -> Line<'static> {
    if zoomed {
        let prefix = "▣ zoomed ";
        let url = truncate_to_width(url, max_width.saturating_sub(prefix.width()));
        Line::from(vec![
            Span::styled(prefix, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
            Span::styled(
                url,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
        ])
    } else {
        let prefix = "▫ ";
        let url = truncate_to_width(url, max_width.saturating_sub(prefix.width()));
        Line::from(vec![
            Span::styled(prefix, Style::default().fg(theme.text_dim)),
            Span::styled(url, Style::default().fg(theme.text_dim)),
        ])
    }
}

/// Render an avatar as half-block cells: each cell shows two pixel rows
pub fn avatar_lines(handle: &AvatarHandle, background: Color) -> Vec<Line<'static>> {
    let to_color = |px: image::Rgba<u8>| {
        if px[3] < 128 {
            background
        } else {
            Color::Rgb(px[0], px[1], px[2])
        }
    };

    (0..handle.height())
        .step_by(2)
        .map(|y| {
            let spans: Vec<Span<'static>> = (0..handle.width())
                .map(|x| {
                    let top = to_color(handle.pixel(x, y));
                    let bottom = to_color(handle.pixel(x, y + 1));
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Helper function to create a centered rect using up certain percentage of the available rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
