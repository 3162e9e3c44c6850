//! Scrollable panel holding a command's text reply.
//!
//! The body arrives already escaped by the core and is shown verbatim, one
//! terminal line per body line.

use std::cell::Cell;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::action::Scroll;
use crate::theme;
use crate::widgets::centered_rect;

#[derive(Debug)]
pub struct ResponsePanel {
    pub title: String,
    body: String,
    offset: u16,
    /// Body lines visible at the last render; drives page size.
    viewport: Cell<u16>,
}

impl ResponsePanel {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            offset: 0,
            viewport: Cell::new(10),
        }
    }

    #[cfg(test)]
    pub fn offset(&self) -> u16 {
        self.offset
    }

    fn line_count(&self) -> u16 {
        u16::try_from(self.body.lines().count()).unwrap_or(u16::MAX)
    }

    fn max_offset(&self) -> u16 {
        self.line_count().saturating_sub(self.viewport.get())
    }

    pub fn scroll(&mut self, step: Scroll) {
        let page = self.viewport.get().max(1);
        let next = match step {
            Scroll::Up => self.offset.saturating_sub(1),
            Scroll::Down => self.offset.saturating_add(1),
            Scroll::PageUp => self.offset.saturating_sub(page),
            Scroll::PageDown => self.offset.saturating_add(page),
        };
        self.offset = next.min(self.max_offset());
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let panel = centered_rect(
            area,
            area.width.saturating_sub(8),
            area.height.saturating_sub(4),
        );

        frame.render_widget(Clear, panel);
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(theme::title_style())
            .title_bottom(Line::from(vec![
                Span::styled(" j/k ", theme::key_hint_key()),
                Span::styled("scroll ", theme::key_hint()),
                Span::styled(" PgUp/PgDn ", theme::key_hint_key()),
                Span::styled("page ", theme::key_hint()),
                Span::styled(" Esc ", theme::key_hint_key()),
                Span::styled("close ", theme::key_hint()),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(panel);
        frame.render_widget(block, panel);
        self.viewport.set(inner.height);

        frame.render_widget(
            Paragraph::new(Text::raw(self.body.as_str()))
                .style(theme::table_row())
                .scroll((self.offset, 0)),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn panel(lines: usize) -> ResponsePanel {
        let body = (0..lines).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        ResponsePanel::new("Response", body)
    }

    #[test]
    fn scrolls_line_by_line() {
        let mut p = panel(30);
        p.scroll(Scroll::Down);
        p.scroll(Scroll::Down);
        assert_eq!(p.offset(), 2);
        p.scroll(Scroll::Up);
        assert_eq!(p.offset(), 1);
    }

    #[test]
    fn never_scrolls_past_either_end() {
        let mut p = panel(30);
        p.scroll(Scroll::Up);
        assert_eq!(p.offset(), 0);
        for _ in 0..10 {
            p.scroll(Scroll::PageDown);
        }
        // 30 lines, 10 visible
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn short_body_does_not_scroll() {
        let mut p = panel(3);
        p.scroll(Scroll::PageDown);
        assert_eq!(p.offset(), 0);
    }
}
