// ── Domain model ──
//
// Canonical types consumed by the CLI and TUI. Wire shapes from
// `fhemly-api` are converted into these in `convert.rs`.

pub mod inventory;
pub mod tree;

pub use inventory::{Device, InventoryPayload, ListGroup};
pub use tree::TreeNode;
