use crate::github::types::UserProfile;
use crate::ui::theme;
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

pub const HEADER_HEIGHT: u16 = 3;

pub struct ProfileHeader<'a> {
    pub profile: Option<&'a UserProfile>,
    pub total_repos: usize,
    pub shown_repos: usize,
}

impl<'a> Widget for ProfileHeader<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let bg = Style::default().bg(theme::HEADER_BG);
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                buf[(x, y)].set_style(bg);
            }
        }
        if area.height == 0 {
            return;
        }

        let mut spans: Vec<Span<'static>> = vec![Span::styled(
            " ghlens",
            Style::default()
                .fg(theme::ACCENT)
                .bg(theme::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        )];
        spans.push(Span::styled(
            " \u{2503} ",
            Style::default().fg(theme::SEPARATOR).bg(theme::HEADER_BG),
        ));

        let Some(p) = self.profile else {
            spans.push(Span::styled(
                "press s to look up a GitHub user",
                Style::default().fg(theme::DIM_TEXT).bg(theme::HEADER_BG),
            ));
            buf.set_line(area.x, area.y, &Line::from(spans), area.width);
            return;
        };

        spans.push(Span::styled(
            p.display_name().to_string(),
            Style::default()
                .bg(theme::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ));
        if p.name.is_some() {
            spans.push(Span::styled(
                format!(" @{}", p.login),
                Style::default().fg(theme::ACCENT).bg(theme::HEADER_BG),
            ));
        }
        if let Some(location) = p.location.as_deref().filter(|l| !l.is_empty()) {
            spans.push(Span::styled(
                format!("  {location}"),
                Style::default().fg(theme::DIM_TEXT).bg(theme::HEADER_BG),
            ));
        }
        let left_line = Line::from(spans);
        buf.set_line(area.x, area.y, &left_line, area.width);

        let counts = if self.shown_repos == self.total_repos {
            format!("{} followers  {} repos ", p.followers, self.total_repos)
        } else {
            format!(
                "{} followers  {}/{} repos ",
                p.followers, self.shown_repos, self.total_repos
            )
        };
        let counts_w = UnicodeWidthStr::width(counts.as_str());
        let left_w = left_line.width();
        let area_w = area.width as usize;
        if area_w > counts_w + left_w {
            let right_x = area.x + (area_w - counts_w) as u16;
            buf.set_line(
                right_x,
                area.y,
                &Line::from(Span::styled(
                    counts,
                    Style::default().fg(theme::DIM_TEXT).bg(theme::HEADER_BG),
                )),
                counts_w as u16,
            );
        }

        if area.height > 1 {
            if let Some(bio) = p.bio.as_deref().filter(|b| !b.trim().is_empty()) {
                let bio = bio.lines().next().unwrap_or("").trim();
                let text = super::truncate_with_ellipsis(bio, area_w.saturating_sub(2));
                buf.set_line(
                    area.x + 1,
                    area.y + 1,
                    &Line::from(Span::styled(
                        text,
                        Style::default()
                            .bg(theme::HEADER_BG)
                            .add_modifier(Modifier::ITALIC),
                    )),
                    area.width.saturating_sub(1),
                );
            }
        }
    }
}
