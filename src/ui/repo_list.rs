use crate::github::types::Repository;
use crate::ui::{format_time_ago, highlighted, theme};
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

pub struct RepoList<'a> {
    pub repos: &'a [Repository],
    pub query: &'a str,
    pub selected: usize,
    pub scroll: usize,
    pub focused: bool,
    pub loading: bool,
}

impl<'a> Widget for RepoList<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let border_style = if self.focused {
            Style::default().fg(theme::ACTIVE_BORDER)
        } else {
            Style::default().fg(theme::BORDER_COLOR)
        };

        let block = Block::default()
            .title(" Repositories ")
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.repos.is_empty() {
            let msg = if self.loading {
                "loading\u{2026}"
            } else if self.query.is_empty() {
                "no repositories"
            } else {
                "no repositories match the filter"
            };
            buf.set_line(
                inner.x + 1,
                inner.y,
                &Line::from(Span::styled(msg, Style::default().fg(theme::DIM_TEXT))),
                inner.width.saturating_sub(1),
            );
            return;
        }

        let visible = inner.height as usize;
        for (i, repo) in self.repos.iter().skip(self.scroll).take(visible).enumerate() {
            let y = inner.y + i as u16;
            let is_selected = self.scroll + i == self.selected;

            let line = repo_line(repo, self.query);
            buf.set_line(inner.x, y, &line, inner.width);

            if is_selected {
                for x in inner.x..(inner.x + inner.width) {
                    buf[(x, y)].set_style(Style::default().bg(theme::SELECTED_BG));
                }
            }
        }
    }
}

fn repo_line(repo: &Repository, query: &str) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(highlighted(
        &repo.name,
        query,
        Style::default().add_modifier(Modifier::BOLD),
    ));
    if repo.private {
        spans.push(Span::styled(
            " private",
            Style::default().fg(theme::PRIVATE_COLOR),
        ));
    }
    if let Some(lang) = repo.language.as_deref() {
        spans.push(Span::raw("  "));
        spans.extend(highlighted(
            lang,
            query,
            Style::default().fg(theme::language_color(lang)),
        ));
    }
    spans.push(Span::styled(
        format!("  \u{2605}{}", repo.stargazers_count),
        Style::default().fg(theme::STAR_COLOR),
    ));
    spans.push(Span::styled(
        format!("  \u{2442}{}", repo.forks_count),
        Style::default().fg(theme::DIM_TEXT),
    ));
    spans.push(Span::styled(
        format!("  {}", format_time_ago(&repo.updated_at)),
        Style::default().fg(theme::DIM_TEXT),
    ));
    if let Some(desc) = repo.description.as_deref().filter(|d| !d.is_empty()) {
        spans.push(Span::raw("  "));
        spans.extend(highlighted(desc, query, Style::default().fg(theme::DIM_TEXT)));
    }
    Line::from(spans)
}
