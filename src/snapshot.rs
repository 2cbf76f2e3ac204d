//! Snapshot codec.
//!
//! Serializes the topology to a flat JSON document and reconstructs it on
//! load. The document has two top-level fields: `devices` (id -> record)
//! and `connections` (sequence of endpoint pairs). There is no version
//! field; missing optional fields get defaults (a device without a subnet
//! gets `255.255.255.0`). Devices are restored first, then connections;
//! a connection whose endpoints are not both present is skipped with a
//! warning, never fatal. A load replaces the whole topology, it does not
//! merge.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::address::DEFAULT_SUBNET_MASK;
use crate::error::CoreError;
use crate::topology::{Device, DeviceType, LinkType, Point, Topology};

/// Per-device entry in the document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Display name, not the id (the id is the map key)
    pub label: String,
    pub position: [f64; 2],
    pub ip: String,
    pub mac: String,
    #[serde(default = "default_subnet")]
    pub subnet: String,
}

fn default_subnet() -> String {
    DEFAULT_SUBNET_MASK.to_string()
}

/// Per-connection entry.
///
/// Written as an `{a, b, link_type}` object so the link type round-trips,
/// but a bare `[a, b]` endpoint pair (the legacy document shape) still
/// deserializes, defaulting the link type to Ethernet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConnectionRecord {
    Typed {
        a: String,
        b: String,
        link_type: LinkType,
    },
    Pair(String, String),
}

impl ConnectionRecord {
    fn parts(&self) -> (&str, &str, LinkType) {
        match self {
            Self::Typed { a, b, link_type } => (a, b, *link_type),
            Self::Pair(a, b) => (a, b, LinkType::default()),
        }
    }
}

/// The flat, file-portable representation of a topology
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub devices: HashMap<String, DeviceRecord>,
    pub connections: Vec<ConnectionRecord>,
}

/// Capture the topology as a document
pub fn serialize(topology: &Topology) -> SnapshotDocument {
    let devices = topology
        .devices()
        .map(|device| {
            (
                device.id.clone(),
                DeviceRecord {
                    label: device.display_name.clone(),
                    position: [device.position.x, device.position.y],
                    ip: device.ip.clone(),
                    mac: device.mac.clone(),
                    subnet: device.subnet_mask.clone(),
                },
            )
        })
        .collect();

    let mut connections: Vec<_> = topology.connections().collect();
    connections.sort_by_key(|c| c.id);
    let connections = connections
        .into_iter()
        .map(|c| ConnectionRecord::Typed {
            a: c.endpoints.0.clone(),
            b: c.endpoints.1.clone(),
            link_type: c.link_type,
        })
        .collect();

    SnapshotDocument { devices, connections }
}

/// Reconstruct a topology from a document.
///
/// Device ids, names, positions and addresses are preserved exactly; the
/// per-type ordinal counters are re-seeded from the highest restored
/// ordinal so ids assigned afterwards never collide.
pub fn deserialize(document: &SnapshotDocument) -> Result<Topology, CoreError> {
    let mut topology = Topology::new();

    for (id, record) in &document.devices {
        let type_label = id.rsplit_once('_').map(|(label, _)| label).unwrap_or(id);
        let device_type = DeviceType::from_label(type_label).ok_or_else(|| {
            CoreError::LoadFormat(format!("device id '{}' has no recognizable type", id))
        })?;
        topology.insert_device(Device {
            id: id.clone(),
            display_name: record.label.clone(),
            device_type,
            position: Point::new(record.position[0], record.position[1]),
            ip: record.ip.clone(),
            mac: record.mac.clone(),
            subnet_mask: record.subnet.clone(),
            connections: Vec::new(),
        })?;
    }

    for record in &document.connections {
        let (a, b, link_type) = record.parts();
        if let Err(error) = topology.add_connection(a, b, link_type) {
            // Defensive: a hand-edited or stale document may reference
            // devices that are not in it
            log::warn!("Skipping connection {} <-> {}: {}", a, b, error);
        }
    }

    Ok(topology)
}

/// Render a document as pretty-printed JSON
pub fn to_json(document: &SnapshotDocument) -> String {
    serde_json::to_string_pretty(document).expect("snapshot document serializes to JSON")
}

/// Parse a document from JSON text
pub fn from_json(text: &str) -> Result<SnapshotDocument, CoreError> {
    serde_json::from_str(text).map_err(|error| CoreError::LoadFormat(error.to_string()))
}
