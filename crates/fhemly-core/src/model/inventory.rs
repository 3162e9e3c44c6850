use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Grouped device inventory, supplied once by the server at load time.
///
/// Read-only input to [`build_tree`](crate::build_tree); group order is
/// the server's and is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryPayload {
    pub groups: Vec<ListGroup>,
}

/// A named group of devices. `devices` may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListGroup {
    /// Absent on malformed entries.
    pub name: Option<String>,
    pub devices: Vec<Device>,
}

/// A single device.
///
/// `attributes` is the server's raw record, passed through untouched for
/// the detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub attributes: IndexMap<String, serde_json::Value>,
}

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Attribute rendered as display text: strings verbatim, everything
    /// else as compact JSON.
    pub fn attribute_text(&self, key: &str) -> Option<String> {
        self.attributes.get(key).map(value_text)
    }

    /// All attributes as `(key, display text)` pairs in server order.
    pub fn attribute_rows(&self) -> impl Iterator<Item = (&str, String)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value_text(value)))
    }
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl ListGroup {
    pub fn new(name: impl Into<String>, devices: Vec<Device>) -> Self {
        Self {
            name: Some(name.into()),
            devices,
        }
    }
}
