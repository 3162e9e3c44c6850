//! Shared helpers for rendering tests.

use ratatui::{Frame, Terminal, backend::TestBackend, buffer::Cell};

/// Draw with `render` on a `width` x `height` test terminal and return the
/// screen as text, one line per row.
#[allow(clippy::unwrap_used)]
pub fn draw_to_text(width: u16, height: u16, render: impl FnOnce(&mut Frame)) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(render).unwrap();
    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .chunks(usize::from(buffer.area.width))
        .map(|row| row.iter().map(Cell::symbol).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
