// ── Device-tree builder ──
//
// Flattens the grouped inventory into the tree shown by the tree pane.
// Unnamed groups are dropped: they are not navigable. Malformed input
// degrades by omission, never by error.

use tracing::debug;

use crate::model::{InventoryPayload, TreeNode};

/// Build the tree for `payload` under a synthetic, expanded root.
///
/// Group order and device order are preserved exactly, so identical
/// inputs always render identically.
pub fn build_tree(payload: &InventoryPayload) -> TreeNode {
    let mut root = TreeNode::root();

    for group in &payload.groups {
        let Some(name) = group.name.as_deref().filter(|n| !n.is_empty()) else {
            debug!(devices = group.devices.len(), "skipping unnamed group");
            continue;
        };

        let node = if group.devices.is_empty() {
            TreeNode::bare_leaf(name)
        } else {
            let leaves = group.devices.iter().cloned().map(TreeNode::device).collect();
            TreeNode::group(name, leaves)
        };

        root.children.push(node);
    }

    root
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Device, ListGroup};

    fn labels(node: &TreeNode) -> Vec<&str> {
        node.children.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn empty_payload_yields_bare_root() {
        let root = build_tree(&InventoryPayload::default());
        assert_eq!(root.label, "root");
        assert!(root.expanded);
        assert!(!root.is_leaf);
        assert!(root.children.is_empty());
    }

    #[test]
    fn lamps_and_sensors_scenario() {
        let payload = InventoryPayload {
            groups: vec![
                ListGroup::new("Lamps", vec![Device::new("Kitchen")]),
                ListGroup::new("", vec![]),
                ListGroup::new("Sensors", vec![]),
            ],
        };

        let root = build_tree(&payload);
        assert_eq!(labels(&root), ["Lamps", "Sensors"]);

        let lamps = &root.children[0];
        assert!(lamps.expanded);
        assert!(!lamps.is_leaf);
        assert!(lamps.payload.is_none());
        assert_eq!(labels(lamps), ["Kitchen"]);
        assert_eq!(lamps.children[0].payload, Some(Device::new("Kitchen")));
        assert!(lamps.children[0].is_leaf);

        let sensors = &root.children[1];
        assert!(sensors.is_leaf);
        assert!(sensors.payload.is_none());
        assert!(sensors.children.is_empty());
    }

    #[test]
    fn absent_group_names_are_skipped() {
        let payload = InventoryPayload {
            groups: vec![
                ListGroup {
                    name: None,
                    devices: vec![Device::new("orphan")],
                },
                ListGroup::new("B", vec![]),
            ],
        };

        let root = build_tree(&payload);
        assert_eq!(labels(&root), ["B"]);
        assert!(root.devices().is_empty());
    }

    #[test]
    fn group_order_is_preserved() {
        let names = ["zeta", "alpha", "", "mid", "beta"];
        let payload = InventoryPayload {
            groups: names.iter().map(|n| ListGroup::new(*n, vec![])).collect(),
        };

        let root = build_tree(&payload);
        assert_eq!(labels(&root), ["zeta", "alpha", "mid", "beta"]);
        assert_eq!(build_tree(&payload), root);
    }

    #[test]
    fn every_device_yields_exactly_one_leaf() {
        let payload = InventoryPayload {
            groups: vec![
                ListGroup::new("Lamps", vec![Device::new("a"), Device::new("b")]),
                ListGroup::new("Dup", vec![Device::new("a"), Device::new("a")]),
                ListGroup::new("Empty", vec![]),
            ],
        };

        let root = build_tree(&payload);
        let names: Vec<&str> = root.devices().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "a", "a"]);
        assert_eq!(root.children[1].children.len(), 2);
    }

    #[test]
    fn leaves_carry_the_raw_record() {
        let mut device = Device::new("Kitchen");
        device
            .attributes
            .insert("STATE".into(), serde_json::json!("on"));
        device
            .attributes
            .insert("ATTR".into(), serde_json::json!({ "room": "Downstairs" }));

        let payload = InventoryPayload {
            groups: vec![ListGroup::new("Lamps", vec![device.clone()])],
        };

        let root = build_tree(&payload);
        assert_eq!(root.device_at(&[0, 0]), Some(&device));
        assert_eq!(root.device_at(&[0]), None);
        assert_eq!(root.device_at(&[3, 1]), None);
    }
}
