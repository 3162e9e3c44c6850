//! Overlays drawn on top of the console screen.

pub mod alert;
pub mod mask;
pub mod response;
pub mod toast;

use ratatui::layout::Rect;

/// A `width` x `height` rect centred in `area`, shrunk to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
