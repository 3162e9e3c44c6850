//! Console core between `fhemly-api` and UI consumers (CLI / TUI).
//!
//! This crate owns everything in the console that has real state-machine
//! behaviour; widgets and layout live in the consumers.
//!
//! - **[`build_tree`]**: Converts the grouped `jsonlist` inventory into the
//!   [`TreeNode`] hierarchy shown by the tree pane. Pure, never fails.
//!
//! - **[`CommandChannel`]**: Sends one textual command and classifies the
//!   reply into a [`CommandOutcome`] (`Empty`, `Text`, `Failed`), emitting
//!   exactly one [`Notice`] to the [`Surface`].
//!
//! - **[`RestartRecovery`]**: After `shutdown restart`, masks the UI and
//!   probes the server on a fixed interval until it answers with a
//!   recognised inventory, then asks the surface to reload.
//!
//! - **[`Console`]**: Cheaply cloneable facade wiring the above to a
//!   [`CommandTransport`] and a [`Surface`].

pub mod builder;
pub mod command;
pub mod config;
pub mod console;
pub mod convert;
pub mod error;
pub mod model;
pub mod notice;
pub mod panels;
pub mod recovery;
pub mod surface;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use builder::build_tree;
pub use command::{CommandChannel, CommandOutcome, ConsoleCommand};
pub use config::{ConsoleConfig, TlsVerification};
pub use console::{Console, HttpConsole, status_text};
pub use error::{CoreError, TransportFailure};
pub use model::{Device, InventoryPayload, ListGroup, TreeNode};
pub use notice::{Notice, escape_for_display};
pub use panels::{PanelId, PanelRegistry};
pub use recovery::{
    ProbeOutcome, ReadinessProbe, ReconnectState, RecoveryConfig, RecoveryOutcome,
    RecoveryPhase, RecoveryTracker, RestartRecovery, is_server_ready,
};
pub use surface::Surface;
pub use transport::CommandTransport;
