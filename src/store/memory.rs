//! In-memory `GraphStore` over fixture data, for tests. Evaluates the same
//! containment and outer-join semantics the Bolt statements delegate to the
//! store, so query code can be exercised without a live graph.

use async_trait::async_trait;

use crate::error::{MacscopeError, Result};
use crate::schema::{BoundingBox, DeviceRelation, DeviceRow, GeoPoint, Sighting};
use crate::store::GraphStore;

/// A fixture device with its sightings and optional metadata.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeviceFixture {
    pub mac: String,
    pub vendor: Option<String>,
    pub ssids: Vec<String>,
    pub hostname: Option<String>,
    /// (lat, lon, location name), one entry per sighting edge.
    pub sightings: Vec<(f64, f64, Option<String>)>,
}

impl DeviceFixture {
    pub fn new(mac: &str) -> Self {
        Self {
            mac: mac.to_string(),
            ..Default::default()
        }
    }

    pub fn vendor(mut self, vendor: &str) -> Self {
        self.vendor = Some(vendor.to_string());
        self
    }

    pub fn ssid(mut self, ssid: &str) -> Self {
        self.ssids.push(ssid.to_string());
        self
    }

    pub fn hostname(mut self, hostname: &str) -> Self {
        self.hostname = Some(hostname.to_string());
        self
    }

    pub fn seen_at(mut self, lat: f64, lon: f64, name: Option<&str>) -> Self {
        self.sightings.push((lat, lon, name.map(str::to_string)));
        self
    }
}

#[derive(Debug, Default)]
pub(crate) struct MemoryGraph {
    devices: Vec<DeviceFixture>,
    /// (device MAC, relationship entry), unfiltered - includes structural edges
    /// when a test stores them.
    relations: Vec<(String, DeviceRelation)>,
    fail: bool,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, device: DeviceFixture) -> Self {
        self.devices.push(device);
        self
    }

    pub fn with_relation(mut self, mac: &str, relation: DeviceRelation) -> Self {
        self.relations.push((mac.to_string(), relation));
        self
    }

    /// Every operation fails with a store error, simulating an outage.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(MacscopeError::Store(neo4rs::Error::UnsupportedVersion(
                "simulated store outage".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn sightings_in_box(&self, bbox: &BoundingBox) -> Result<Vec<Sighting>> {
        self.check()?;
        let mut out = Vec::new();
        for device in &self.devices {
            for (lat, lon, name) in &device.sightings {
                if bbox.contains(*lat, *lon) {
                    out.push(Sighting {
                        lat: *lat,
                        lon: *lon,
                        mac: device.mac.clone(),
                        name: name.clone(),
                    });
                }
            }
        }
        Ok(out)
    }

    async fn locations_for_mac(&self, mac: &str) -> Result<Vec<GeoPoint>> {
        self.check()?;
        Ok(self
            .devices
            .iter()
            .filter(|d| d.mac == mac)
            .flat_map(|d| d.sightings.iter())
            .map(|(lat, lon, _)| GeoPoint {
                lat: *lat,
                lon: *lon,
            })
            .collect())
    }

    async fn known_macs(&self) -> Result<Vec<String>> {
        self.check()?;
        let mut macs: Vec<String> = self
            .devices
            .iter()
            .filter(|d| !d.sightings.is_empty())
            .map(|d| d.mac.clone())
            .collect();
        macs.sort();
        macs.dedup();
        Ok(macs)
    }

    async fn device_relationships(&self, mac: &str) -> Result<Vec<DeviceRelation>> {
        self.check()?;
        Ok(self
            .relations
            .iter()
            .filter(|(m, _)| m == mac)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn devices_in_box(&self, bbox: &BoundingBox) -> Result<Vec<DeviceRow>> {
        self.check()?;
        let mut out = Vec::new();
        for device in &self.devices {
            let sighted = device
                .sightings
                .iter()
                .any(|(lat, lon, _)| bbox.contains(*lat, *lon));
            if !sighted {
                continue;
            }
            // Outer-join expansion: one row per SSID, or a single row with no
            // SSID, mirroring the OPTIONAL MATCH cartesian the store produces.
            let ssids: Vec<Option<String>> = if device.ssids.is_empty() {
                vec![None]
            } else {
                device.ssids.iter().cloned().map(Some).collect()
            };
            for ssid in ssids {
                out.push(DeviceRow {
                    mac: device.mac.clone(),
                    vendor: device.vendor.clone(),
                    ssid,
                    hostname: device.hostname.clone(),
                });
            }
        }
        Ok(out)
    }
}
