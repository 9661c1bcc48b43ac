use crate::ui::input::InputMode;
use crate::ui::theme;
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

const SPINNER: &[char] = &[
    '\u{280b}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283c}', '\u{2834}', '\u{2826}', '\u{2827}',
];

pub struct StatusBar<'a> {
    pub mode: InputMode,
    pub search_text: &'a str,
    pub filter_text: &'a str,
    pub active_query: &'a str,
    pub loading: bool,
    pub spinner_frame: usize,
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let bg = Style::default().bg(theme::STATUS_BG);
        for x in area.x..area.right() {
            buf[(x, area.y)].set_style(bg);
        }

        if self.mode.is_editing() {
            let (prefix, text) = match self.mode {
                InputMode::Search => (" user: ", self.search_text),
                InputMode::Filter => (" /", self.filter_text),
                InputMode::Normal => unreachable!(),
            };
            let mut spans = vec![
                Span::styled(
                    prefix,
                    Style::default()
                        .fg(theme::FILTER_COLOR)
                        .bg(theme::STATUS_BG)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(text.to_string(), bg),
                Span::styled(
                    "\u{258c}",
                    Style::default().fg(theme::FILTER_COLOR).bg(theme::STATUS_BG),
                ),
            ];
            if self.loading {
                spans.push(self.spinner());
            }
            buf.set_line(area.x, area.y, &Line::from(spans), area.width);
            return;
        }

        let sep = Span::styled(
            "\u{2502}",
            Style::default().fg(theme::BORDER_COLOR).bg(theme::STATUS_BG),
        );
        let mut spans = vec![Span::styled(" ", bg)];

        if self.loading {
            spans.push(self.spinner());
            spans.push(Span::styled(format!("looking up {} ", self.active_query), bg));
        } else if self.active_query.is_empty() {
            spans.push(Span::styled(
                "idle ",
                Style::default().fg(theme::DIM_TEXT).bg(theme::STATUS_BG),
            ));
        } else {
            spans.push(Span::styled(format!("user: {} ", self.active_query), bg));
        }

        if !self.filter_text.is_empty() {
            spans.push(sep.clone());
            spans.push(Span::styled(
                format!(" filter: {} ", self.filter_text),
                Style::default().fg(theme::FILTER_COLOR).bg(theme::STATUS_BG),
            ));
        }

        spans.push(sep);
        spans.push(Span::styled(
            " s search  / filter  ? help ",
            Style::default().fg(theme::DIM_TEXT).bg(theme::STATUS_BG),
        ));

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

impl<'a> StatusBar<'a> {
    fn spinner(&self) -> Span<'static> {
        Span::styled(
            format!("{} ", SPINNER[self.spinner_frame % SPINNER.len()]),
            Style::default().fg(theme::ACCENT).bg(theme::STATUS_BG),
        )
    }
}
