//! Store capability: the read-only operations this crate needs from a
//! property-graph store.
//!
//! The production implementation is [`BoltGraph`], a thin adapter over the
//! Bolt driver. Query code depends only on the trait, so tests run against an
//! in-memory store instead of a live Neo4j.

mod bolt;
#[cfg(test)]
pub(crate) mod memory;

pub use bolt::BoltGraph;

use async_trait::async_trait;

use crate::error::Result;
use crate::schema::{BoundingBox, DeviceRelation, DeviceRow, GeoPoint, Sighting};

/// Synchronous (one round trip per call, fully buffered) read access to the
/// survey graph. Implementations never mutate graph state.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Every sighting whose location lies inside the box, one record per
    /// `SEEN_AT` edge. A flipped box matches nothing.
    async fn sightings_in_box(&self, bbox: &BoundingBox) -> Result<Vec<Sighting>>;

    /// Every location a device has been seen at. Empty when the MAC is
    /// unknown or has no sightings; the two cases are not distinguished.
    async fn locations_for_mac(&self, mac: &str) -> Result<Vec<GeoPoint>>;

    /// Distinct addresses of devices with at least one sighting.
    async fn known_macs(&self) -> Result<Vec<String>>;

    /// Every relationship attached to a device, with the far-side node's
    /// labels and full property map. Not filtered; the summarizer applies
    /// the exclusion set.
    async fn device_relationships(&self, mac: &str) -> Result<Vec<DeviceRelation>>;

    /// Distinct devices sighted inside the box, outer-joined against their
    /// optional vendor, SSID, and hostname nodes: one row per attribute
    /// combination, with `None` where a device lacks the attribute.
    async fn devices_in_box(&self, bbox: &BoundingBox) -> Result<Vec<DeviceRow>>;
}
