pub mod detail_panel;
pub mod help_panel;
pub mod input;
pub mod profile_header;
pub mod repo_list;
pub mod status_bar;
pub mod theme;
pub mod toast;

use crate::filter::{highlight, segments};
use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    if max <= 1 {
        return "\u{2026}".to_string();
    }
    let mut result = String::new();
    let mut w = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if w + cw > max - 1 {
            break;
        }
        result.push(ch);
        w += cw;
    }
    result.push('\u{2026}');
    result
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vert = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Min(0),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Min(0),
    ])
    .split(vert[1])[1]
}

/// Spans for `text` with every match of `query` emphasised on top of `base`.
pub fn highlighted(text: &str, query: &str, base: Style) -> Vec<Span<'static>> {
    let hl = base
        .fg(theme::HIGHLIGHT_FG)
        .bg(theme::HIGHLIGHT_BG)
        .add_modifier(Modifier::BOLD);
    let spans = highlight(text, query);
    segments(text, &spans)
        .into_iter()
        .map(|(seg, is_match)| Span::styled(seg.to_string(), if is_match { hl } else { base }))
        .collect()
}

fn duration_bucket(time: &DateTime<Utc>) -> (i64, &'static str) {
    let dur = Utc::now().signed_duration_since(*time);
    if dur.num_seconds() < 60 {
        (dur.num_seconds().max(0), "s")
    } else if dur.num_minutes() < 60 {
        (dur.num_minutes(), "m")
    } else if dur.num_hours() < 24 {
        (dur.num_hours(), "h")
    } else if dur.num_days() < 30 {
        (dur.num_days(), "d")
    } else if dur.num_days() < 365 {
        (dur.num_days() / 30, "mo")
    } else {
        (dur.num_days() / 365, "y")
    }
}

pub fn format_time_ago(time: &DateTime<Utc>) -> String {
    let (val, unit) = duration_bucket(time);
    format!("{val}{unit} ago")
}
