//! Graph schema contract: the node labels, relationship types, and record
//! shapes every query in this crate assumes.
//!
//! The graph itself is written by an external capture-ingestion process; this
//! crate only reads it. Devices are `MAC` nodes keyed by their address, sighted
//! at `Location` nodes via `SEEN_AT` edges (one edge per sighting, never
//! deduplicated), and optionally linked to `Vendor`, `SSID`, and `Hostname`
//! metadata nodes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MacscopeError, Result};

/// Node label for devices. Identity is the `address` property (unique MAC).
pub const LABEL_DEVICE: &str = "MAC";
/// Node label for geographic sighting locations (`location` point, optional `name`).
pub const LABEL_LOCATION: &str = "Location";
/// Node label for OUI-derived vendors (`name`).
pub const LABEL_VENDOR: &str = "Vendor";
/// Node label for broadcast network names (`name`).
pub const LABEL_SSID: &str = "SSID";
/// Node label for observed hostnames (`hostname`).
pub const LABEL_HOSTNAME: &str = "Hostname";

pub const REL_SEEN_AT: &str = "SEEN_AT";
pub const REL_HAS_VENDOR: &str = "HAS_VENDOR";
pub const REL_BROADCASTS: &str = "BROADCASTS";
pub const REL_HAS_HOSTNAME: &str = "HAS_HOSTNAME";
pub const REL_PROBE_RESPONSE_TO: &str = "PROBE_RESPONSE_TO";
pub const REL_COMMUNICATES_WITH: &str = "COMMUNICATES_WITH";
pub const REL_MULTICASTS_TO: &str = "MULTICASTS_TO";

/// Relationship types omitted from device summaries. These are the
/// high-cardinality structural edges (sightings and per-frame protocol
/// observations); a summary of everything else is what remains useful to a
/// human. Fixed configuration - changing it means editing this constant.
pub const SUMMARY_EXCLUDED: [&str; 4] = [
    REL_SEEN_AT,
    REL_PROBE_RESPONSE_TO,
    REL_COMMUNICATES_WITH,
    REL_MULTICASTS_TO,
];

/// Vendor label substituted for devices with no `HAS_VENDOR` edge.
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// A scalar property value carried by a graph node.
///
/// Node properties are schema-flexible: the summarizer passes them through
/// without assuming a shape, so the variant set mirrors what the store can
/// hold rather than any per-label schema. Serialized untagged, so JSON output
/// is the plain value (`null`, `true`, `42`, `"foo"`, `[...]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
}

/// Property map of a graph node, opaque to this crate.
pub type Properties = BTreeMap<String, Value>;

/// Axis-aligned geographic rectangle: bottom-left and top-right corners in
/// WGS84-like coordinates. Containment is inclusive of edges. There is no
/// antimeridian handling: a box whose bottom bound exceeds its top bound
/// matches nothing, and is never auto-corrected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top_lat: f64,
    pub top_lon: f64,
    pub bottom_lat: f64,
    pub bottom_lon: f64,
}

impl BoundingBox {
    /// Build a box from the four bounds, rejecting non-finite values.
    pub fn new(top_lat: f64, top_lon: f64, bottom_lat: f64, bottom_lon: f64) -> Result<Self> {
        for (name, value) in [
            ("topLat", top_lat),
            ("topLon", top_lon),
            ("bottomLat", bottom_lat),
            ("bottomLon", bottom_lon),
        ] {
            if !value.is_finite() {
                return Err(MacscopeError::InvalidCoordinate(format!(
                    "{} is not a finite number",
                    name
                )));
            }
        }
        Ok(Self {
            top_lat,
            top_lon,
            bottom_lat,
            bottom_lon,
        })
    }

    /// Inclusive containment test. False for every point when the box is
    /// flipped (bottom bound greater than top bound).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.bottom_lat <= lat && lat <= self.top_lat && self.bottom_lon <= lon && lon <= self.top_lon
    }
}

/// A geographic point, as returned by reverse lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One sighting record: a device observed at a location. A device seen at
/// several locations inside a box yields one record per `SEEN_AT` edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    pub lat: f64,
    pub lon: f64,
    pub mac: String,
    pub name: Option<String>,
}

/// One device-attribute row from the store: a distinct device inside a box
/// joined (outer) against its optional vendor, SSID, and hostname. The store
/// returns one row per attribute combination; the aggregator collapses them.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    pub mac: String,
    pub vendor: Option<String>,
    pub ssid: Option<String>,
    pub hostname: Option<String>,
}

/// One summarized relationship attached to a device: the edge type, the
/// labels of the far-side node, and that node's full property map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRelation {
    pub relationship: String,
    pub node_labels: Vec<String>,
    pub properties: Properties,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_rejects_non_finite() {
        assert!(BoundingBox::new(f64::NAN, 0.0, 0.0, 0.0).is_err());
        assert!(BoundingBox::new(0.0, f64::INFINITY, 0.0, 0.0).is_err());
        assert!(BoundingBox::new(0.0, 0.0, f64::NEG_INFINITY, 0.0).is_err());
        assert!(BoundingBox::new(51.52, -0.09, 51.50, -0.12).is_ok());
    }

    #[test]
    fn test_bounding_box_contains_is_inclusive() {
        let bbox = BoundingBox::new(51.52, -0.09, 51.50, -0.12).unwrap();
        assert!(bbox.contains(51.51, -0.10));
        // Every edge and corner is inside
        assert!(bbox.contains(51.50, -0.12));
        assert!(bbox.contains(51.52, -0.09));
        assert!(bbox.contains(51.50, -0.09));
        assert!(bbox.contains(51.52, -0.12));
        // Just outside each bound
        assert!(!bbox.contains(51.53, -0.10));
        assert!(!bbox.contains(51.49, -0.10));
        assert!(!bbox.contains(51.51, -0.08));
        assert!(!bbox.contains(51.51, -0.13));
    }

    #[test]
    fn test_flipped_box_contains_nothing() {
        // bottom > top on both axes: predicate is false for all points,
        // including the corners themselves
        let bbox = BoundingBox::new(51.50, -0.12, 51.52, -0.09).unwrap();
        assert!(!bbox.contains(51.51, -0.10));
        assert!(!bbox.contains(51.50, -0.12));
        assert!(!bbox.contains(51.52, -0.09));
    }

    #[test]
    fn test_value_serializes_untagged() {
        let props: Properties = [
            ("channel".to_string(), Value::Int(6)),
            ("hidden".to_string(), Value::Bool(false)),
            ("signal".to_string(), Value::Float(-42.5)),
            ("ssid".to_string(), Value::String("cafe".to_string())),
            ("notes".to_string(), Value::Null),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "channel": 6,
                "hidden": false,
                "signal": -42.5,
                "ssid": "cafe",
                "notes": null,
            })
        );
    }

    #[test]
    fn test_summary_exclusions_are_the_structural_edges() {
        assert!(SUMMARY_EXCLUDED.contains(&REL_SEEN_AT));
        assert!(SUMMARY_EXCLUDED.contains(&REL_PROBE_RESPONSE_TO));
        assert!(SUMMARY_EXCLUDED.contains(&REL_COMMUNICATES_WITH));
        assert!(SUMMARY_EXCLUDED.contains(&REL_MULTICASTS_TO));
        assert!(!SUMMARY_EXCLUDED.contains(&REL_HAS_VENDOR));
        assert!(!SUMMARY_EXCLUDED.contains(&REL_BROADCASTS));
        assert!(!SUMMARY_EXCLUDED.contains(&REL_HAS_HOSTNAME));
    }
}
