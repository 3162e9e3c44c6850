//! Self-dismissing notice near the top centre. Fades out after a hold.

use std::time::Instant;

use fhemly_core::notice::{toast_expired, toast_opacity};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::theme;

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self::shown_at(message, Instant::now())
    }

    pub fn shown_at(message: impl Into<String>, at: Instant) -> Self {
        Self {
            message: message.into(),
            shown_at: at,
        }
    }

    pub fn opacity(&self, now: Instant) -> f32 {
        toast_opacity(now.saturating_duration_since(self.shown_at))
    }

    pub fn expired(&self, now: Instant) -> bool {
        toast_expired(now.saturating_duration_since(self.shown_at))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn render_toast(frame: &mut Frame, area: Rect, toast: &Toast, now: Instant) {
    let opacity = toast.opacity(now);
    if opacity <= 0.0 {
        return;
    }

    let width = (toast.message.chars().count() as u16 + 8)
        .clamp(20, 60)
        .min(area.width);
    let x = area.x + (area.width - width) / 2;
    let toast_area = Rect::new(x, area.y + 1, width, 3).intersection(area);
    if toast_area.is_empty() {
        return;
    }

    let accent = theme::blend(theme::SUCCESS_GREEN, theme::BG_DARK, opacity);
    let text = theme::blend(theme::DIM_WHITE, theme::BG_DARK, opacity);

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(theme::BG_DARK));

    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(" ✓ ", Style::default().fg(accent)),
        Span::styled(toast.message.as_str(), Style::default().fg(text)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::draw_to_text;

    #[test]
    fn toast_lives_five_seconds() {
        let start = Instant::now();
        let toast = Toast::shown_at("Command submitted!", start);

        assert!((toast.opacity(start) - 1.0).abs() < f32::EPSILON);
        assert!((toast.opacity(start + Duration::from_secs(2)) - 1.0).abs() < f32::EPSILON);
        assert!(toast.opacity(start + Duration::from_secs(4)) < 1.0);
        assert!(!toast.expired(start + Duration::from_millis(4900)));
        assert!(toast.expired(start + Duration::from_secs(5)));
    }

    #[test]
    fn clock_before_show_counts_as_fresh() {
        let start = Instant::now();
        let toast = Toast::shown_at("x", start + Duration::from_secs(1));
        assert!((toast.opacity(start) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn short_frames_clip_the_toast() {
        let start = Instant::now();
        let toast = Toast::shown_at("Save successful!", start);
        for height in 1..=3 {
            draw_to_text(40, height, |frame| {
                render_toast(frame, frame.area(), &toast, start);
            });
        }

        let screen = draw_to_text(40, 4, |frame| {
            render_toast(frame, frame.area(), &toast, start);
        });
        assert!(screen.contains("Save successful!"));
    }
}
