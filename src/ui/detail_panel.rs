use crate::github::types::Repository;
use crate::ui::{format_time_ago, highlighted, theme};
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct DetailPanel<'a> {
    pub repo: &'a Repository,
    pub query: &'a str,
}

impl<'a> Widget for DetailPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let block = Block::default()
            .title(format!(" {} ", self.repo.name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        let label_style = Style::default().fg(theme::ACCENT);
        let r = self.repo;
        let mut lines: Vec<Line<'static>> = Vec::new();

        if let Some(desc) = r.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(Line::from(highlighted(desc, self.query, Style::default())));
            lines.push(Line::default());
        }

        let mut lang = vec![Span::styled("Language ", label_style)];
        match r.language.as_deref() {
            Some(l) => lang.extend(highlighted(
                l,
                self.query,
                Style::default().fg(theme::language_color(l)),
            )),
            None => lang.push(Span::styled("-", Style::default().fg(theme::DIM_TEXT))),
        }
        lines.push(Line::from(lang));

        if !r.topics.is_empty() {
            let mut topics = vec![Span::styled("Topics ", label_style)];
            for (i, t) in r.topics.iter().enumerate() {
                if i > 0 {
                    topics.push(Span::raw(", "));
                }
                topics.extend(highlighted(t, self.query, Style::default()));
            }
            lines.push(Line::from(topics));
        }

        lines.push(Line::from(vec![
            Span::styled("Stars ", label_style),
            Span::raw(r.stargazers_count.to_string()),
            Span::styled("  Forks ", label_style),
            Span::raw(r.forks_count.to_string()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Updated ", label_style),
            Span::raw(format_time_ago(&r.updated_at)),
            Span::styled(
                format!(" ({})", r.updated_at.format("%Y-%m-%d")),
                Style::default().fg(theme::DIM_TEXT),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Visibility ", label_style),
            Span::raw(if r.private { "private" } else { "public" }),
        ]));
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("URL ", label_style),
            Span::raw(r.html_url.clone()),
        ]));
        if !r.clone_url.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Clone ", label_style),
                Span::raw(r.clone_url.clone()),
            ]));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
