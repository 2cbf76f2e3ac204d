//! Topology aggregate root.
//!
//! This file owns all device and connection entities and enforces the
//! structural invariants: unique never-reused device ids, exactly two
//! distinct endpoints per connection, and cascade deletion of incident
//! connections when a device is removed. It holds no rendering handles;
//! the UI collaborator renders from the events emitted by the controller
//! and queries the store for geometry.

use std::collections::HashMap;

use crate::address;
use crate::error::CoreError;
use crate::topology::types::{Connection, ConnectionId, Device, DeviceType, LinkType, Point};

/// Pointer hit radius around a device center, in canvas units.
/// Device icons render at 40-50 px, so half of that plus slack.
pub const DEVICE_HIT_RADIUS: f64 = 30.0;

/// Pointer hit radius around a connection segment, in canvas units
pub const CONNECTION_HIT_RADIUS: f64 = 8.0;

/// The canvas item nearest to a pointer position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Device(String),
    Connection(ConnectionId),
}

/// A read-only node record in the exported graph view
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub ip: String,
    pub mac: String,
}

/// A read-only edge record in the exported graph view
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub a: String,
    pub b: String,
    pub link_type: LinkType,
}

/// Adjacency/attribute view of the topology, computed on demand for
/// visualization collaborators. Nodes are sorted by id and edges by
/// connection id so the view is deterministic.
#[derive(Debug, Clone)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// In-memory network diagram: devices keyed by id, connections keyed by a
/// monotonically assigned id. The topology exclusively owns both; no
/// entity outlives it or is shared across instances.
#[derive(Debug, Default)]
pub struct Topology {
    devices: HashMap<String, Device>,
    connections: HashMap<ConnectionId, Connection>,
    /// Highest ordinal ever assigned per device type. Ordinals only
    /// increase; deletion never frees one for reuse.
    ordinals: HashMap<DeviceType, u32>,
    next_connection_id: ConnectionId,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Create a device of the given type at a canvas position.
    ///
    /// The id is `<TypeLabel>_<ordinal>` with a per-type ordinal that only
    /// ever increases, the display name is `<TypeLabel> <ordinal>`, and the
    /// address fields are freshly generated mock values.
    pub fn add_device(&mut self, device_type: DeviceType, position: Point) -> &Device {
        let ordinal = self.ordinals.entry(device_type).or_insert(0);
        *ordinal += 1;
        let id = format!("{}_{}", device_type.label(), ordinal);
        let device = Device {
            display_name: format!("{} {}", device_type.label(), ordinal),
            device_type,
            position,
            ip: address::generate_ipv4(),
            mac: address::generate_mac(),
            subnet_mask: address::DEFAULT_SUBNET_MASK.to_string(),
            connections: Vec::new(),
            id: id.clone(),
        };
        log::info!(
            "Added device {} at ({:.1}, {:.1}) with IP {}",
            id,
            position.x,
            position.y,
            device.ip
        );
        self.devices.entry(id).or_insert(device)
    }

    /// Insert a fully formed device, preserving its id and addresses.
    ///
    /// Used by the snapshot codec; the per-type ordinal counter is bumped
    /// to the parsed ordinal so ids assigned after a load never collide
    /// with restored ones.
    pub(crate) fn insert_device(&mut self, device: Device) -> Result<(), CoreError> {
        if self.devices.contains_key(&device.id) {
            return Err(CoreError::LoadFormat(format!(
                "duplicate device id '{}'",
                device.id
            )));
        }
        if let Some(ordinal) = device.ordinal() {
            let seed = self.ordinals.entry(device.device_type).or_insert(0);
            *seed = (*seed).max(ordinal);
        }
        self.devices.insert(device.id.clone(), device);
        Ok(())
    }

    /// Update a device's canvas position
    pub fn move_device(&mut self, id: &str, position: Point) -> Result<(), CoreError> {
        let device = self
            .devices
            .get_mut(id)
            .ok_or_else(|| CoreError::InvalidDevice(id.to_string()))?;
        device.position = position;
        Ok(())
    }

    /// Commit an edit of a device's name and address fields.
    ///
    /// The edit is transactional: every address field is validated before
    /// any write happens, and a single failure rejects the whole edit with
    /// the original values retained.
    pub fn edit_device(
        &mut self,
        id: &str,
        display_name: &str,
        ip: &str,
        mac: &str,
        subnet_mask: &str,
    ) -> Result<(), CoreError> {
        if !self.devices.contains_key(id) {
            return Err(CoreError::InvalidDevice(id.to_string()));
        }
        if !address::validate_ipv4(ip) {
            return Err(CoreError::Validation {
                field: "IP address",
                value: ip.to_string(),
            });
        }
        if !address::validate_mac(mac) {
            return Err(CoreError::Validation {
                field: "MAC address",
                value: mac.to_string(),
            });
        }
        if !address::validate_subnet_mask(subnet_mask) {
            return Err(CoreError::Validation {
                field: "subnet mask",
                value: subnet_mask.to_string(),
            });
        }

        let device = self.devices.get_mut(id).expect("existence checked above");
        device.display_name = display_name.to_string();
        device.ip = ip.to_string();
        device.mac = mac.to_string();
        device.subnet_mask = subnet_mask.to_string();
        log::info!("Edited device {}: name '{}', IP {}", id, display_name, ip);
        Ok(())
    }

    /// Remove a device, cascading to every incident connection.
    ///
    /// Returns the removed device together with the cascaded connections,
    /// or `None` if the id is unknown.
    pub fn remove_device(&mut self, id: &str) -> Option<(Device, Vec<Connection>)> {
        let device = self.devices.remove(id)?;
        let mut cascaded = Vec::new();
        for conn_id in &device.connections {
            if let Some(conn) = self.connections.remove(conn_id) {
                // Drop the back-reference held by the opposite endpoint
                if let Some(other) = conn.other_endpoint(id) {
                    if let Some(peer) = self.devices.get_mut(other) {
                        peer.connections.retain(|c| c != conn_id);
                    }
                }
                cascaded.push(conn);
            } else {
                debug_assert!(false, "device {} referenced missing connection {}", id, conn_id);
            }
        }
        log::info!(
            "Removed device {} and {} incident connection(s)",
            id,
            cascaded.len()
        );
        Some((device, cascaded))
    }

    /// Create a connection between two distinct existing devices.
    ///
    /// Exactly two distinct endpoints per connection is a hard invariant
    /// enforced here, not a property of iteration order.
    pub fn add_connection(
        &mut self,
        a: &str,
        b: &str,
        link_type: LinkType,
    ) -> Result<ConnectionId, CoreError> {
        if !self.devices.contains_key(a) {
            return Err(CoreError::InvalidDevice(a.to_string()));
        }
        if !self.devices.contains_key(b) {
            return Err(CoreError::InvalidDevice(b.to_string()));
        }
        if a == b {
            return Err(CoreError::SelfLoop(a.to_string()));
        }

        let id = self.next_connection_id;
        self.next_connection_id += 1;
        self.connections.insert(
            id,
            Connection {
                id,
                endpoints: (a.to_string(), b.to_string()),
                link_type,
            },
        );
        self.devices
            .get_mut(a)
            .expect("endpoint existence checked above")
            .connections
            .push(id);
        self.devices
            .get_mut(b)
            .expect("endpoint existence checked above")
            .connections
            .push(id);
        log::info!("Added {} connection {} between {} and {}", link_type.label(), id, a, b);
        Ok(id)
    }

    /// Remove a connection and the back-references both endpoints hold.
    /// Unknown ids are a no-op, reported as `None`.
    pub fn remove_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        let conn = self.connections.remove(&id)?;
        let (a, b) = (&conn.endpoints.0, &conn.endpoints.1);
        for endpoint in [a, b] {
            if let Some(device) = self.devices.get_mut(endpoint) {
                device.connections.retain(|c| *c != id);
            } else {
                debug_assert!(false, "connection {} referenced missing device {}", id, endpoint);
            }
        }
        log::info!("Removed connection {} between {} and {}", id, a, b);
        Some(conn)
    }

    /// Neighbor device ids of `id`, following the insertion order of its
    /// connections. This order seeds the breadth-first traversal and is
    /// what breaks shortest-path ties.
    pub fn neighbors(&self, id: &str) -> Vec<String> {
        let Some(device) = self.devices.get(id) else {
            return Vec::new();
        };
        device
            .connections
            .iter()
            .filter_map(|conn_id| {
                let conn = self.connections.get(conn_id);
                debug_assert!(conn.is_some(), "dangling connection {} on {}", conn_id, id);
                conn.and_then(|c| c.other_endpoint(id)).map(str::to_string)
            })
            .collect()
    }

    /// Resolve the canvas item nearest to a pointer position.
    ///
    /// Devices are matched against their icon radius, connections against
    /// the distance to their segment. When both are in range the closer
    /// one wins, with connections taking an exact tie.
    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        let nearest_device = self
            .devices
            .values()
            .map(|d| (d.id.clone(), point.distance_to(d.position)))
            .filter(|(_, dist)| *dist <= DEVICE_HIT_RADIUS)
            .min_by(|(_, x), (_, y)| x.total_cmp(y));

        let nearest_connection = self
            .connections
            .values()
            .filter_map(|conn| {
                let a = self.devices.get(&conn.endpoints.0)?.position;
                let b = self.devices.get(&conn.endpoints.1)?.position;
                Some((conn.id, point.distance_to_segment(a, b)))
            })
            .filter(|(_, dist)| *dist <= CONNECTION_HIT_RADIUS)
            .min_by(|(_, x), (_, y)| x.total_cmp(y));

        match (nearest_device, nearest_connection) {
            (Some((id, d_dist)), Some((conn, c_dist))) => {
                if d_dist < c_dist {
                    Some(Hit::Device(id))
                } else {
                    Some(Hit::Connection(conn))
                }
            }
            (Some((id, _)), None) => Some(Hit::Device(id)),
            (None, Some((conn, _))) => Some(Hit::Connection(conn)),
            (None, None) => None,
        }
    }

    /// Export the adjacency/attribute view used by visualization
    /// collaborators and diagnostics.
    pub fn graph_view(&self) -> GraphView {
        let mut nodes: Vec<GraphNode> = self
            .devices
            .values()
            .map(|d| GraphNode {
                id: d.id.clone(),
                label: d.display_name.clone(),
                ip: d.ip.clone(),
                mac: d.mac.clone(),
            })
            .collect();
        nodes.sort_by(|x, y| x.id.cmp(&y.id));

        let mut edges: Vec<(ConnectionId, GraphEdge)> = self
            .connections
            .values()
            .map(|c| {
                (
                    c.id,
                    GraphEdge {
                        a: c.endpoints.0.clone(),
                        b: c.endpoints.1.clone(),
                        link_type: c.link_type,
                    },
                )
            })
            .collect();
        edges.sort_by_key(|(id, _)| *id);

        GraphView {
            nodes,
            edges: edges.into_iter().map(|(_, e)| e).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(topo: &mut Topology, device_type: DeviceType, x: f64, y: f64) -> String {
        topo.add_device(device_type, Point::new(x, y)).id.clone()
    }

    #[test]
    fn test_generated_ids_are_unique_and_typed() {
        let mut topo = Topology::new();
        let r1 = place(&mut topo, DeviceType::Router, 0.0, 0.0);
        let r2 = place(&mut topo, DeviceType::Router, 10.0, 0.0);
        let s1 = place(&mut topo, DeviceType::Switch, 20.0, 0.0);
        assert_eq!(r1, "Router_1");
        assert_eq!(r2, "Router_2");
        assert_eq!(s1, "Switch_1");
        assert_eq!(topo.device(&r1).unwrap().display_name, "Router 1");
    }

    #[test]
    fn test_ordinals_never_reused_after_deletion() {
        let mut topo = Topology::new();
        let r1 = place(&mut topo, DeviceType::Router, 0.0, 0.0);
        let r2 = place(&mut topo, DeviceType::Router, 10.0, 0.0);
        topo.remove_device(&r1);
        topo.remove_device(&r2);
        let r3 = place(&mut topo, DeviceType::Router, 20.0, 0.0);
        assert_eq!(r3, "Router_3");
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut topo = Topology::new();
        let r1 = place(&mut topo, DeviceType::Router, 0.0, 0.0);
        assert_eq!(
            topo.add_connection(&r1, &r1, LinkType::Ethernet),
            Err(CoreError::SelfLoop(r1))
        );
    }

    #[test]
    fn test_connection_requires_both_endpoints() {
        let mut topo = Topology::new();
        let r1 = place(&mut topo, DeviceType::Router, 0.0, 0.0);
        assert_eq!(
            topo.add_connection(&r1, "Switch_9", LinkType::Ethernet),
            Err(CoreError::InvalidDevice("Switch_9".to_string()))
        );
    }

    #[test]
    fn test_remove_device_cascades_connections() {
        let mut topo = Topology::new();
        let r1 = place(&mut topo, DeviceType::Router, 0.0, 0.0);
        let s1 = place(&mut topo, DeviceType::Switch, 100.0, 0.0);
        let c1 = place(&mut topo, DeviceType::Computer, 200.0, 0.0);
        topo.add_connection(&r1, &s1, LinkType::Ethernet).unwrap();
        topo.add_connection(&s1, &c1, LinkType::Wireless).unwrap();

        let (_, cascaded) = topo.remove_device(&s1).unwrap();
        assert_eq!(cascaded.len(), 2);
        assert_eq!(topo.connection_count(), 0);
        // Back-references are gone from the surviving endpoints too
        assert!(topo.device(&r1).unwrap().connections.is_empty());
        assert!(topo.device(&c1).unwrap().connections.is_empty());
    }

    #[test]
    fn test_edit_is_atomic() {
        let mut topo = Topology::new();
        let r1 = place(&mut topo, DeviceType::Router, 0.0, 0.0);
        let before = topo.device(&r1).unwrap().clone();

        let result = topo.edit_device(&r1, "Edge Router", "256.1.1.1", "aa:bb:cc:dd:ee:ff", "255.255.255.0");
        assert!(matches!(result, Err(CoreError::Validation { field: "IP address", .. })));

        let after = topo.device(&r1).unwrap();
        assert_eq!(after.display_name, before.display_name);
        assert_eq!(after.ip, before.ip);
        assert_eq!(after.mac, before.mac);
        assert_eq!(after.subnet_mask, before.subnet_mask);

        topo.edit_device(&r1, "Edge Router", "10.0.0.1", "aa:bb:cc:dd:ee:ff", "255.255.0.0")
            .unwrap();
        let edited = topo.device(&r1).unwrap();
        assert_eq!(edited.display_name, "Edge Router");
        assert_eq!(edited.ip, "10.0.0.1");
    }

    #[test]
    fn test_hit_test_prefers_closest_item() {
        let mut topo = Topology::new();
        let r1 = place(&mut topo, DeviceType::Router, 0.0, 0.0);
        let s1 = place(&mut topo, DeviceType::Switch, 200.0, 0.0);
        let conn = topo.add_connection(&r1, &s1, LinkType::Ethernet).unwrap();

        // On top of the router
        assert_eq!(topo.hit_test(Point::new(2.0, 3.0)), Some(Hit::Device(r1)));
        // Mid-segment, far from either icon
        assert_eq!(
            topo.hit_test(Point::new(100.0, 4.0)),
            Some(Hit::Connection(conn))
        );
        // Empty canvas
        assert_eq!(topo.hit_test(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_neighbors_follow_connection_insertion_order() {
        let mut topo = Topology::new();
        let hub = place(&mut topo, DeviceType::Switch, 0.0, 0.0);
        let c1 = place(&mut topo, DeviceType::Computer, 100.0, 0.0);
        let c2 = place(&mut topo, DeviceType::Computer, 0.0, 100.0);
        let c3 = place(&mut topo, DeviceType::Computer, -100.0, 0.0);
        topo.add_connection(&hub, &c2, LinkType::Ethernet).unwrap();
        topo.add_connection(&hub, &c3, LinkType::Ethernet).unwrap();
        topo.add_connection(&hub, &c1, LinkType::Ethernet).unwrap();
        assert_eq!(topo.neighbors(&hub), vec![c2, c3, c1]);
    }
}
