//! All UI actions. Every state change in the app goes through one of these.

use std::sync::Arc;

use fhemly_core::{Notice, RecoveryPhase, TreeNode};

/// Scroll step for the response panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Up,
    Down,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),
    ToggleHelp,

    // ── Loading ──
    TreeLoaded(Arc<TreeNode>),
    VersionLoaded(String),
    LoadFailed(String),
    PhaseChanged(RecoveryPhase),

    // ── Surface (from the core) ──
    Notify(Notice),
    Mask(String),
    Unmask,
    Reload,

    // ── Button bar ──
    Execute(String),
    /// Save the configuration; carries the command field text, if any.
    SaveConfig(Option<String>),
    Shutdown,
    Restart,

    // ── Overlays ──
    DismissAlert,
    CloseResponse,
    ScrollResponse(Scroll),
}
