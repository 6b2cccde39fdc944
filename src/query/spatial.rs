//! Spatial queries: sightings inside a bounding box, and reverse lookup of
//! every location a device has been seen at.

use crate::error::Result;
use crate::query::require_mac;
use crate::schema::{BoundingBox, GeoPoint, Sighting};
use crate::store::GraphStore;

/// Every (device, location) sighting inside the axis-aligned box given by its
/// top-right and bottom-left corners. One record per sighting edge, so a
/// device seen at several in-box locations appears once per sighting. Order
/// is unspecified.
///
/// Bounds must be finite; a flipped box (bottom bound above top bound) is not
/// corrected and matches nothing.
pub async fn query_in_box(
    store: &dyn GraphStore,
    top_lat: f64,
    top_lon: f64,
    bottom_lat: f64,
    bottom_lon: f64,
) -> Result<Vec<Sighting>> {
    let bbox = BoundingBox::new(top_lat, top_lon, bottom_lat, bottom_lon)?;
    store.sightings_in_box(&bbox).await
}

/// All locations a device has been seen at. An empty result means the MAC is
/// unknown or has no recorded sightings; the caller decides how to report
/// that condition.
pub async fn locations_for_mac(store: &dyn GraphStore, mac: &str) -> Result<Vec<GeoPoint>> {
    let mac = require_mac(mac)?;
    store.locations_for_mac(mac).await
}
