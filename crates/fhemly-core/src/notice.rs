// ── Notices ──
//
// The three one-shot UI effects a command can produce, plus the timing of
// the self-dismissing toast. Response bodies are untrusted server output
// and are neutralised before they reach a surface.

use std::fmt::Write as _;
use std::time::Duration;

/// How long a toast stays fully visible.
pub const TOAST_HOLD: Duration = Duration::from_secs(2);
/// How long a toast takes to fade out after the hold.
pub const TOAST_FADE: Duration = Duration::from_secs(3);

/// A single UI notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking modal that the user must acknowledge.
    Alert { title: String, message: String },
    /// Persistent, scrollable, dismissable panel. `body` is already escaped.
    Panel { title: String, body: String },
    /// Transient notice near the top centre; dismisses itself.
    Toast { message: String },
}

impl Notice {
    pub fn alert(message: impl Into<String>) -> Self {
        Self::Alert {
            title: "Error".into(),
            message: message.into(),
        }
    }

    /// Response panel for a raw server body, escaped for literal display.
    pub fn response(body: &str) -> Self {
        Self::Panel {
            title: "Response".into(),
            body: escape_for_display(body),
        }
    }

    pub fn toast(message: impl Into<String>) -> Self {
        Self::Toast {
            message: message.into(),
        }
    }
}

/// Total lifetime of a toast.
pub fn toast_lifetime() -> Duration {
    TOAST_HOLD + TOAST_FADE
}

/// Toast opacity after `elapsed`: 1.0 during the hold, then an ease-out
/// fade reaching 0.0 at [`toast_lifetime`].
pub fn toast_opacity(elapsed: Duration) -> f32 {
    if elapsed <= TOAST_HOLD {
        return 1.0;
    }
    let fading = elapsed - TOAST_HOLD;
    if fading >= TOAST_FADE {
        return 0.0;
    }
    let t = fading.as_secs_f32() / TOAST_FADE.as_secs_f32();
    // ease-out: fast start, slow finish
    (1.0 - t) * (1.0 - t)
}

/// Whether a toast shown `elapsed` ago should be removed.
pub fn toast_expired(elapsed: Duration) -> bool {
    elapsed >= toast_lifetime()
}

/// Make `text` safe to show verbatim on a terminal.
///
/// Newlines and tabs are kept, and a CRLF line ending becomes a plain
/// newline. Every other control character (a lone CR, or ESC, which would
/// start a terminal escape sequence) is replaced by a visible `\u{..}`
/// escape, so server output can never restyle or move the cursor.
pub fn escape_for_display(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' | '\t' => out.push(c),
            '\r' if chars.peek() == Some(&'\n') => {}
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:02x}}}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}
