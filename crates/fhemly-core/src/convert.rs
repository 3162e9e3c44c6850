// ── Wire → domain conversion ──
//
// `jsonlist` records are kept whole as the device's attributes; only the
// `NAME` field is lifted out for the tree label.

use fhemly_api::{JsonList, ListEntry};

use crate::model::{Device, InventoryPayload, ListGroup};

/// Record field holding the device name.
const NAME_FIELD: &str = "NAME";

impl From<JsonList> for InventoryPayload {
    fn from(list: JsonList) -> Self {
        Self {
            groups: list.results.into_iter().map(ListGroup::from).collect(),
        }
    }
}

impl From<ListEntry> for ListGroup {
    fn from(entry: ListEntry) -> Self {
        Self {
            name: entry.list,
            devices: entry.devices.into_iter().map(Device::from).collect(),
        }
    }
}

impl From<fhemly_api::models::RawDevice> for Device {
    fn from(record: fhemly_api::models::RawDevice) -> Self {
        let name = record
            .get(NAME_FIELD)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned();
        Self {
            name,
            attributes: record,
        }
    }
}
