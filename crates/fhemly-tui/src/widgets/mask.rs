//! Full-screen "please wait" overlay shown while the server restarts.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Clear, Paragraph},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::theme;

#[derive(Debug, Default)]
pub struct RestartMask {
    pub message: String,
    throbber: ThrobberState,
}

impl RestartMask {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            throbber: ThrobberState::default(),
        }
    }

    /// Advance the spinner one frame.
    pub fn tick(&mut self) {
        self.throbber.calc_next();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, detail: Option<&str>) {
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            area,
        );

        let rows = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

        let width = u16::try_from(self.message.chars().count() + 4).unwrap_or(area.width);
        let columns = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(rows[1]);

        let throbber = Throbber::default()
            .label(format!(" {}", self.message))
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, columns[1], &mut self.throbber.clone());

        if let Some(detail) = detail {
            frame.render_widget(
                Paragraph::new(Span::styled(detail, theme::key_hint()))
                    .alignment(ratatui::layout::Alignment::Center),
                rows[3],
            );
        }
    }
}
