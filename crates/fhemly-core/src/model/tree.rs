use serde::Serialize;

use super::inventory::Device;

/// Label of the synthetic root node.
pub const ROOT_LABEL: &str = "root";

/// Node of the device tree handed to the tree surface.
///
/// A node is a leaf iff it carries a [`Device`], except for groups without
/// devices, which are bare leaves with no payload. Groups with devices are
/// never leaves and are always expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub label: String,
    pub expanded: bool,
    pub is_leaf: bool,
    pub children: Vec<TreeNode>,
    pub payload: Option<Device>,
}

impl TreeNode {
    /// Empty synthetic root.
    pub fn root() -> Self {
        Self {
            label: ROOT_LABEL.into(),
            expanded: true,
            is_leaf: false,
            children: Vec::new(),
            payload: None,
        }
    }

    /// Expanded group node holding one leaf per device.
    pub fn group(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.into(),
            expanded: true,
            is_leaf: false,
            children,
            payload: None,
        }
    }

    /// Leaf carrying a device record, labelled with the device name.
    pub fn device(device: Device) -> Self {
        Self {
            label: device.name.clone(),
            expanded: false,
            is_leaf: true,
            children: Vec::new(),
            payload: Some(device),
        }
    }

    /// Leaf with a label only (a group without devices).
    pub fn bare_leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            expanded: false,
            is_leaf: true,
            children: Vec::new(),
            payload: None,
        }
    }

    /// Node reached by following child indices from `self`.
    pub fn get(&self, path: &[usize]) -> Option<&TreeNode> {
        path.iter()
            .try_fold(self, |node, &idx| node.children.get(idx))
    }

    /// Device carried by the node at `path`, if any.
    pub fn device_at(&self, path: &[usize]) -> Option<&Device> {
        self.get(path).and_then(|node| node.payload.as_ref())
    }

    /// All devices in depth-first order.
    pub fn devices(&self) -> Vec<&Device> {
        let mut out = Vec::new();
        self.collect_devices(&mut out);
        out
    }

    fn collect_devices<'a>(&'a self, out: &mut Vec<&'a Device>) {
        if let Some(ref device) = self.payload {
            out.push(device);
        }
        for child in &self.children {
            child.collect_devices(out);
        }
    }
}
