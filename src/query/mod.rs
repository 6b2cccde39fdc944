//! Query operations: the spatial engine, reverse lookup, relationship
//! summarizer, and vendor aggregator, each a stateless function of its
//! parameters and the store handle.

pub mod spatial;
pub mod summary;
pub mod vendors;

pub use spatial::{locations_for_mac, query_in_box};
pub use summary::summarize_mac;
pub use vendors::{aggregate, vendors_in_box, VendorGroup, VendorReport};

use crate::error::{MacscopeError, Result};
use crate::store::GraphStore;

/// Distinct addresses of devices with at least one sighting.
pub async fn known_macs(store: &dyn GraphStore) -> Result<Vec<String>> {
    store.known_macs().await
}

/// Reject an absent or blank MAC before any query is issued.
pub(crate) fn require_mac(mac: &str) -> Result<&str> {
    if mac.trim().is_empty() {
        return Err(MacscopeError::MissingParameter("mac_address"));
    }
    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{DeviceFixture, MemoryGraph};

    #[test]
    fn test_require_mac_rejects_blank() {
        assert!(matches!(
            require_mac(""),
            Err(MacscopeError::MissingParameter("mac_address"))
        ));
        assert!(matches!(
            require_mac("   "),
            Err(MacscopeError::MissingParameter("mac_address"))
        ));
        assert_eq!(require_mac("AA:BB:CC:DD:EE:FF").unwrap(), "AA:BB:CC:DD:EE:FF");
    }

    #[tokio::test]
    async fn test_known_macs_lists_sighted_devices() {
        let store = MemoryGraph::new()
            .with_device(DeviceFixture::new("AA:BB:CC:DD:EE:FF").seen_at(51.51, -0.1, None))
            .with_device(DeviceFixture::new("11:22:33:44:55:66").seen_at(48.85, 2.35, None))
            .with_device(DeviceFixture::new("DE:AD:BE:EF:00:00"));
        let macs = known_macs(&store).await.unwrap();
        assert_eq!(macs, vec!["11:22:33:44:55:66", "AA:BB:CC:DD:EE:FF"]);
    }
}
