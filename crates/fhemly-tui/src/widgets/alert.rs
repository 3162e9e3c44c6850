//! Blocking error dialog. Nothing else reacts to input until it is dismissed.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::theme;
use crate::widgets::centered_rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn render_alert(frame: &mut Frame, area: Rect, alert: &Alert) {
    let width = (alert.message.chars().count() as u16 + 6).clamp(30, 70);
    let dialog = centered_rect(area, width, 7);

    frame.render_widget(Clear, dialog);
    let block = Block::default()
        .title(format!(" {} ", alert.title))
        .title_style(Style::default().fg(theme::ERROR_RED))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ERROR_RED))
        .style(Style::default().bg(theme::BG_DARK));

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let text = vec![
        Line::from(Span::styled(
            alert.message.as_str(),
            Style::default().fg(theme::DIM_WHITE),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", theme::key_hint_key()),
            Span::styled(" dismiss", theme::key_hint()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}
