// Wire types for the `jsonlist` command.
//
// The server answers `jsonlist` with a grouped inventory:
// `{ "ResultSet": "full", "Results": [ { "list": "Lamps", "devices": [ {...} ] } ] }`.
// Device records are kept as raw JSON objects; their field set depends on
// the device module and is not interpreted here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Raw device record as sent by the server.
pub type RawDevice = IndexMap<String, serde_json::Value>;

/// Top-level `jsonlist` response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsonList {
    #[serde(rename = "ResultSet", default)]
    pub result_set: Option<String>,
    #[serde(rename = "Results", default)]
    pub results: Vec<ListEntry>,
}

/// One device group (a FHEM device type or room listing).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListEntry {
    /// Group name. May be absent or empty on malformed entries.
    #[serde(default)]
    pub list: Option<String>,
    #[serde(default)]
    pub devices: Vec<RawDevice>,
}

impl JsonList {
    /// Decode a `jsonlist` body. The body is kept in the error for diagnostics.
    pub fn from_body(body: String) -> Result<Self, Error> {
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

/// First non-empty line of a `version` reply, trimmed.
pub fn version_banner(body: &str) -> &str {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_grouped_inventory() {
        let body = r#"{
            "ResultSet": "full",
            "Results": [
                { "list": "Lamps", "devices": [ { "NAME": "Kitchen", "STATE": "on" } ] },
                { "list": "Sensors", "devices": [] }
            ]
        }"#;

        let parsed: JsonList = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result_set.as_deref(), Some("full"));
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].list.as_deref(), Some("Lamps"));
        assert_eq!(parsed.results[0].devices[0]["NAME"], "Kitchen");
        assert!(parsed.results[1].devices.is_empty());
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        let parsed: JsonList = serde_json::from_str(r#"{ "Results": [ {} ] }"#).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert!(parsed.results[0].list.is_none());
        assert!(parsed.results[0].devices.is_empty());

        let empty: JsonList = serde_json::from_str("{}").unwrap();
        assert!(empty.results.is_empty());
    }

    #[test]
    fn device_field_order_is_preserved() {
        let parsed: JsonList = serde_json::from_str(
            r#"{ "Results": [ { "list": "X", "devices": [ { "NAME": "a", "TYPE": "dummy", "STATE": "off" } ] } ] }"#,
        )
        .unwrap();
        let keys: Vec<&str> = parsed.results[0].devices[0]
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["NAME", "TYPE", "STATE"]);
    }

    #[test]
    fn from_body_keeps_the_offending_body() {
        let err = JsonList::from_body("Unknown command JsonList, try help\n".into()).unwrap_err();
        match err {
            Error::Deserialization { body, .. } => {
                assert_eq!(body, "Unknown command JsonList, try help\n");
            }
            other => panic!("expected deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn version_banner_skips_blank_lines() {
        assert_eq!(
            version_banner("\n  fhem.pl:1.2 2013-03-10  \nmodules...\n"),
            "fhem.pl:1.2 2013-03-10"
        );
        assert_eq!(version_banner(""), "");
    }
}
