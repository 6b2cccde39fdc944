//! Bolt adapter: executes the crate's Cypher statements against a Neo4j-style
//! store and decodes rows into schema records.
//!
//! Each operation is one parametrized statement whose row stream is drained
//! fully before returning (aggregation needs the whole result anyway). The
//! spatial predicate is evaluated store-side with `point.withinBBox`; point
//! coordinates come back through Cypher's `.latitude`/`.longitude` accessors
//! so every column decodes as a plain scalar.

use async_trait::async_trait;
use neo4rs::{query, Graph, Node};

use crate::error::Result;
use crate::schema::{
    BoundingBox, DeviceRelation, DeviceRow, GeoPoint, Properties, Sighting, Value, LABEL_DEVICE,
    LABEL_HOSTNAME, LABEL_LOCATION, LABEL_SSID, LABEL_VENDOR, REL_BROADCASTS, REL_HAS_HOSTNAME,
    REL_HAS_VENDOR, REL_SEEN_AT, SUMMARY_EXCLUDED,
};
use crate::store::GraphStore;

/// Graph store adapter over the Bolt protocol.
///
/// The underlying driver pools connections internally; a session is acquired
/// per executed statement and released when its stream is drained, on every
/// exit path.
pub struct BoltGraph {
    graph: Graph,
}

impl BoltGraph {
    /// Connect and verify the credentials with a `RETURN 1` round trip, so a
    /// bad URI or password fails at startup rather than on the first query.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password).await?;
        let mut rows = graph.execute(query("RETURN 1")).await?;
        while rows.next().await?.is_some() {}
        log::info!("Connected to graph store at {}", uri);
        Ok(Self { graph })
    }
}

/// `WHERE` clause matching sighting locations inside the parametrized box.
/// `withinBBox` takes the bottom-left then top-right corner and is inclusive
/// of edges; it matches nothing when a bottom bound exceeds a top bound.
fn within_bbox_clause() -> String {
    "WHERE point.withinBBox(a.location, \
     point({latitude: $bottom_lat, longitude: $bottom_lon}), \
     point({latitude: $top_lat, longitude: $top_lon}))"
        .to_string()
}

fn sightings_statement() -> String {
    format!(
        "MATCH (b:{dev})-[:{seen}]->(a:{loc}) {bbox} \
         RETURN a.location.latitude AS lat, a.location.longitude AS lon, \
         b.address AS mac, a.name AS name",
        dev = LABEL_DEVICE,
        seen = REL_SEEN_AT,
        loc = LABEL_LOCATION,
        bbox = within_bbox_clause(),
    )
}

fn locations_statement() -> String {
    format!(
        "MATCH (b:{dev} {{address: $mac}})-[:{seen}]->(a:{loc}) \
         RETURN a.location.latitude AS lat, a.location.longitude AS lon",
        dev = LABEL_DEVICE,
        seen = REL_SEEN_AT,
        loc = LABEL_LOCATION,
    )
}

fn known_macs_statement() -> String {
    format!(
        "MATCH (b:{dev})-[:{seen}]->(:{loc}) RETURN DISTINCT b.address AS address",
        dev = LABEL_DEVICE,
        seen = REL_SEEN_AT,
        loc = LABEL_LOCATION,
    )
}

/// Relationship listing with the structural-edge exclusion pushed down, so
/// per-frame observation edges never cross the wire. The summarizer filters
/// against the same constant.
fn relationships_statement() -> String {
    let excluded = SUMMARY_EXCLUDED
        .iter()
        .map(|t| format!("'{}'", t))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "MATCH (b:{dev} {{address: $mac}})-[r]->(n) \
         WHERE NOT type(r) IN [{excluded}] \
         RETURN type(r) AS relationship, labels(n) AS node_labels, n",
        dev = LABEL_DEVICE,
        excluded = excluded,
    )
}

fn devices_statement() -> String {
    format!(
        "MATCH (b:{dev})-[:{seen}]->(a:{loc}) {bbox} \
         WITH DISTINCT b \
         OPTIONAL MATCH (b)-[:{has_vendor}]->(v:{vendor}) \
         OPTIONAL MATCH (b)-[:{broadcasts}]->(s:{ssid}) \
         OPTIONAL MATCH (b)-[:{has_hostname}]->(h:{hostname}) \
         RETURN b.address AS mac, v.name AS vendor, s.name AS ssid, h.hostname AS hostname",
        dev = LABEL_DEVICE,
        seen = REL_SEEN_AT,
        loc = LABEL_LOCATION,
        bbox = within_bbox_clause(),
        has_vendor = REL_HAS_VENDOR,
        vendor = LABEL_VENDOR,
        broadcasts = REL_BROADCASTS,
        ssid = LABEL_SSID,
        has_hostname = REL_HAS_HOSTNAME,
        hostname = LABEL_HOSTNAME,
    )
}

fn bbox_query(statement: String, bbox: &BoundingBox) -> neo4rs::Query {
    query(&statement)
        .param("top_lat", bbox.top_lat)
        .param("top_lon", bbox.top_lon)
        .param("bottom_lat", bbox.bottom_lat)
        .param("bottom_lon", bbox.bottom_lon)
}

/// Decode a node's property map without assuming a schema. Properties that
/// have no scalar rendering (points, nested maps) decode as `Null`.
fn node_properties(node: &Node) -> Properties {
    let mut properties = Properties::new();
    for key in node.keys() {
        properties.insert(key.to_string(), node_property(node, key));
    }
    properties
}

fn node_property(node: &Node, key: &str) -> Value {
    if let Ok(v) = node.get::<bool>(key) {
        return Value::Bool(v);
    }
    if let Ok(v) = node.get::<i64>(key) {
        return Value::Int(v);
    }
    if let Ok(v) = node.get::<f64>(key) {
        return Value::Float(v);
    }
    if let Ok(v) = node.get::<String>(key) {
        return Value::String(v);
    }
    if let Ok(v) = node.get::<Vec<i64>>(key) {
        return Value::List(v.into_iter().map(Value::Int).collect());
    }
    if let Ok(v) = node.get::<Vec<f64>>(key) {
        return Value::List(v.into_iter().map(Value::Float).collect());
    }
    if let Ok(v) = node.get::<Vec<String>>(key) {
        return Value::List(v.into_iter().map(Value::String).collect());
    }
    Value::Null
}

#[async_trait]
impl GraphStore for BoltGraph {
    async fn sightings_in_box(&self, bbox: &BoundingBox) -> Result<Vec<Sighting>> {
        let mut rows = self
            .graph
            .execute(bbox_query(sightings_statement(), bbox))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(Sighting {
                lat: row.get("lat")?,
                lon: row.get("lon")?,
                mac: row.get("mac")?,
                name: row.get("name")?,
            });
        }
        Ok(out)
    }

    async fn locations_for_mac(&self, mac: &str) -> Result<Vec<GeoPoint>> {
        let mut rows = self
            .graph
            .execute(query(&locations_statement()).param("mac", mac))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(GeoPoint {
                lat: row.get("lat")?,
                lon: row.get("lon")?,
            });
        }
        Ok(out)
    }

    async fn known_macs(&self) -> Result<Vec<String>> {
        let mut rows = self.graph.execute(query(&known_macs_statement())).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row.get("address")?);
        }
        Ok(out)
    }

    async fn device_relationships(&self, mac: &str) -> Result<Vec<DeviceRelation>> {
        let mut rows = self
            .graph
            .execute(query(&relationships_statement()).param("mac", mac))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let node: Node = row.get("n")?;
            out.push(DeviceRelation {
                relationship: row.get("relationship")?,
                node_labels: row.get("node_labels")?,
                properties: node_properties(&node),
            });
        }
        Ok(out)
    }

    async fn devices_in_box(&self, bbox: &BoundingBox) -> Result<Vec<DeviceRow>> {
        let mut rows = self
            .graph
            .execute(bbox_query(devices_statement(), bbox))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(DeviceRow {
                mac: row.get("mac")?,
                vendor: row.get("vendor")?,
                ssid: row.get("ssid")?,
                hostname: row.get("hostname")?,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationships_statement_excludes_structural_edges() {
        let statement = relationships_statement();
        for excluded in SUMMARY_EXCLUDED {
            assert!(
                statement.contains(&format!("'{}'", excluded)),
                "statement should filter {}: {}",
                excluded,
                statement
            );
        }
        assert!(statement.contains("NOT type(r) IN"));
        assert!(statement.contains("labels(n) AS node_labels"));
    }

    #[test]
    fn test_spatial_statements_use_within_bbox() {
        for statement in [sightings_statement(), devices_statement()] {
            assert!(statement.contains("point.withinBBox"));
            // bottom-left corner first, then top-right
            let bottom = statement.find("$bottom_lat").unwrap();
            let top = statement.find("$top_lat").unwrap();
            assert!(bottom < top);
        }
    }

    #[test]
    fn test_devices_statement_deduplicates_before_joins() {
        let statement = devices_statement();
        let distinct = statement.find("WITH DISTINCT b").unwrap();
        let first_join = statement.find("OPTIONAL MATCH").unwrap();
        assert!(distinct < first_join);
    }

    #[test]
    fn test_known_macs_statement_is_distinct() {
        assert!(known_macs_statement().contains("RETURN DISTINCT b.address"));
    }
}
