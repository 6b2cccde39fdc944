//! Relationship summarizer: everything attached to a device except the
//! high-cardinality structural edges.

use crate::error::Result;
use crate::query::require_mac;
use crate::schema::{DeviceRelation, SUMMARY_EXCLUDED};
use crate::store::GraphStore;

/// Every relationship attached to a device's node, minus the fixed exclusion
/// set ([`SUMMARY_EXCLUDED`]). Each entry carries the edge type, the far-side
/// node's labels, and its full property map, passed through without schema
/// assumptions. One entry per relationship instance, order unspecified.
pub async fn summarize_mac(store: &dyn GraphStore, mac: &str) -> Result<Vec<DeviceRelation>> {
    let mac = require_mac(mac)?;
    let relations = store.device_relationships(mac).await?;
    Ok(relations
        .into_iter()
        .filter(|r| !SUMMARY_EXCLUDED.contains(&r.relationship.as_str()))
        .collect())
}
