//! Output formatting: plain, table, JSON.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain is indented text.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use fhemly_core::TreeNode;

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled on stderr.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Device tree ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "State")]
    state: String,
}

/// Render the device tree in the chosen format.
pub fn render_tree(format: &OutputFormat, root: &TreeNode) -> String {
    match format {
        OutputFormat::Plain => {
            let mut out = String::new();
            for child in &root.children {
                render_plain(child, 0, &mut out);
            }
            out.trim_end().to_owned()
        }
        OutputFormat::Table => {
            let rows: Vec<DeviceRow> = root
                .children
                .iter()
                .flat_map(|group| {
                    group.children.iter().filter_map(move |leaf| {
                        leaf.payload.as_ref().map(|device| DeviceRow {
                            group: group.label.clone(),
                            device: device.name.clone(),
                            kind: device.attribute_text("TYPE").unwrap_or_default(),
                            state: device.attribute_text("STATE").unwrap_or_default(),
                        })
                    })
                })
                .collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => render_json(root, false),
        OutputFormat::JsonCompact => render_json(root, true),
    }
}

fn render_plain(node: &TreeNode, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&node.label);
    out.push('\n');
    for child in &node.children {
        render_plain(child, depth + 1, out);
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
