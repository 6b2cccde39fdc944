//! Vendor aggregator: turns device rows from a bounding-box match into
//! per-vendor rollups with deduplicated MAC/SSID/hostname sets, plus a global
//! summary.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::{BoundingBox, DeviceRow, UNKNOWN_VENDOR};
use crate::store::GraphStore;

/// Aggregate row for one vendor: how many distinct devices carry it, and the
/// deduplicated attribute sets collected over exactly those devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorGroup {
    pub vendor: String,
    pub count: usize,
    pub macs: BTreeSet<String>,
    pub ssids: BTreeSet<String>,
    pub hostnames: BTreeSet<String>,
}

/// Vendor rollups plus the global unions across all vendors. `total` is the
/// number of distinct devices matched, which equals the sum of the per-vendor
/// counts because every device lands in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorReport {
    pub vendors: Vec<VendorGroup>,
    pub total: usize,
    pub all_macs: BTreeSet<String>,
    pub all_ssids: BTreeSet<String>,
    pub all_hostnames: BTreeSet<String>,
}

/// Attributes of one distinct device, collapsed from its attribute rows.
#[derive(Debug, Default)]
struct DeviceProfile {
    vendor: Option<String>,
    ssids: BTreeSet<String>,
    hostnames: BTreeSet<String>,
}

/// Collapse raw device-attribute rows into the vendor report.
///
/// Devices are deduplicated first: however many rows the outer-join expansion
/// produced for a device, it is counted once. A device with no vendor is
/// bucketed under [`UNKNOWN_VENDOR`]; a device with several vendor edges
/// keeps the first vendor seen, so the bucket counts still sum to the
/// distinct-device total. Sets are freshly built per call, with
/// case-sensitive exact string membership. Row order does not matter beyond
/// that first-vendor tiebreak.
pub fn aggregate(rows: &[DeviceRow]) -> VendorReport {
    let mut devices: BTreeMap<String, DeviceProfile> = BTreeMap::new();
    for row in rows {
        let device = devices.entry(row.mac.clone()).or_default();
        if device.vendor.is_none() {
            device.vendor = row.vendor.clone();
        }
        if let Some(ssid) = &row.ssid {
            device.ssids.insert(ssid.clone());
        }
        if let Some(hostname) = &row.hostname {
            device.hostnames.insert(hostname.clone());
        }
    }

    let mut groups: BTreeMap<String, VendorGroup> = BTreeMap::new();
    let mut report = VendorReport::default();
    for (mac, profile) in devices {
        let vendor = profile
            .vendor
            .unwrap_or_else(|| UNKNOWN_VENDOR.to_string());
        let group = groups.entry(vendor.clone()).or_insert_with(|| VendorGroup {
            vendor,
            count: 0,
            macs: BTreeSet::new(),
            ssids: BTreeSet::new(),
            hostnames: BTreeSet::new(),
        });
        group.count += 1;
        group.macs.insert(mac.clone());
        group.ssids.extend(profile.ssids.iter().cloned());
        group.hostnames.extend(profile.hostnames.iter().cloned());

        report.total += 1;
        report.all_macs.insert(mac);
        report.all_ssids.extend(profile.ssids);
        report.all_hostnames.extend(profile.hostnames);
    }
    report.vendors = groups.into_values().collect();
    report
}

/// Vendor-level aggregate of every distinct device sighted inside the box.
/// Same bound validation and containment semantics as the raw spatial query.
pub async fn vendors_in_box(
    store: &dyn GraphStore,
    top_lat: f64,
    top_lon: f64,
    bottom_lat: f64,
    bottom_lon: f64,
) -> Result<VendorReport> {
    let bbox = BoundingBox::new(top_lat, top_lon, bottom_lat, bottom_lon)?;
    let rows = store.devices_in_box(&bbox).await?;
    Ok(aggregate(&rows))
}
