//! Topology entity definitions.
//!
//! This file contains the value types owned by the topology store: devices,
//! connections, link types and canvas coordinates. These are pure data
//! plus small helpers; all invariant enforcement lives in the store.

use serde::{Deserialize, Serialize};

/// Identifier for a connection, monotonically assigned by the store.
pub type ConnectionId = u64;

/// Kind of network hardware a device represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    Router,
    Switch,
    Computer,
    Laptop,
    Server,
    Smartphone,
}

impl DeviceType {
    /// The label used as the id prefix and default display name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Router => "Router",
            Self::Switch => "Switch",
            Self::Computer => "Computer",
            Self::Laptop => "Laptop",
            Self::Server => "Server",
            Self::Smartphone => "Smartphone",
        }
    }

    /// Parse a type label back into a device type
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Router" => Some(Self::Router),
            "Switch" => Some(Self::Switch),
            "Computer" => Some(Self::Computer),
            "Laptop" => Some(Self::Laptop),
            "Server" => Some(Self::Server),
            "Smartphone" => Some(Self::Smartphone),
            _ => None,
        }
    }

    /// All supported device types
    pub fn all() -> [DeviceType; 6] {
        [
            Self::Router,
            Self::Switch,
            Self::Computer,
            Self::Laptop,
            Self::Server,
            Self::Smartphone,
        ]
    }
}

/// Physical medium of a connection. Categorical only: link type never
/// affects path cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LinkType {
    #[default]
    Ethernet,
    FiberOptic,
    Wireless,
}

impl LinkType {
    /// Human-readable label for menus and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ethernet => "Ethernet",
            Self::FiberOptic => "Fiber Optic",
            Self::Wireless => "Wireless",
        }
    }
}

/// A 2D canvas coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Linear interpolation between two points, `t` in [0, 1]
    pub fn lerp(start: Point, end: Point, t: f64) -> Point {
        Point {
            x: start.x + (end.x - start.x) * t,
            y: start.y + (end.y - start.y) * t,
        }
    }

    /// Distance from this point to the segment between `a` and `b`
    pub fn distance_to_segment(&self, a: Point, b: Point) -> f64 {
        let len_sq = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
        if len_sq == 0.0 {
            return self.distance_to(a);
        }
        let t = ((self.x - a.x) * (b.x - a.x) + (self.y - a.y) * (b.y - a.y)) / len_sq;
        let t = t.clamp(0.0, 1.0);
        self.distance_to(Point::lerp(a, b, t))
    }
}

/// A node in the topology graph.
///
/// The `id` uniquely keys exactly one device for the lifetime of the
/// topology; ordinals are scoped per type and never reused, even after
/// deletion. The display name is independent of the id and freely editable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Stable unique key of the form `<TypeLabel>_<ordinal>`
    pub id: String,
    /// User-facing name, mutable through the edit flow
    pub display_name: String,
    /// Hardware kind, immutable after creation
    pub device_type: DeviceType,
    /// Canvas position, mutable by drag
    pub position: Point,
    /// Mock IPv4 address, generated at creation, editable thereafter
    pub ip: String,
    /// Mock MAC address, generated at creation, editable thereafter
    pub mac: String,
    /// Subnet mask, defaults to `255.255.255.0`
    pub subnet_mask: String,
    /// Connection ids incident to this device, in insertion order.
    /// Back-references only; the store owns the connections.
    pub connections: Vec<ConnectionId>,
}

impl Device {
    /// The per-type ordinal parsed from the id suffix, if well formed
    pub fn ordinal(&self) -> Option<u32> {
        self.id.rsplit_once('_').and_then(|(_, n)| n.parse().ok())
    }
}

/// An undirected edge between two distinct devices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    /// Exactly two distinct endpoint device ids, enforced at creation
    pub endpoints: (String, String),
    /// Physical medium, fixed at creation time
    pub link_type: LinkType,
}

impl Connection {
    /// Whether the given device is one of this connection's endpoints
    pub fn touches(&self, device_id: &str) -> bool {
        self.endpoints.0 == device_id || self.endpoints.1 == device_id
    }

    /// The endpoint opposite `device_id`, if `device_id` is an endpoint
    pub fn other_endpoint(&self, device_id: &str) -> Option<&str> {
        if self.endpoints.0 == device_id {
            Some(&self.endpoints.1)
        } else if self.endpoints.1 == device_id {
            Some(&self.endpoints.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_type_label_roundtrip() {
        for device_type in DeviceType::all() {
            assert_eq!(DeviceType::from_label(device_type.label()), Some(device_type));
        }
        assert_eq!(DeviceType::from_label("Toaster"), None);
    }

    #[test]
    fn test_point_lerp_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(20.0, 10.0);
        assert_eq!(Point::lerp(a, b, 0.0), a);
        assert_eq!(Point::lerp(a, b, 1.0), b);
        assert_eq!(Point::lerp(a, b, 0.5), Point::new(10.0, 5.0));
    }

    #[test]
    fn test_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        // Perpendicular to the middle of the segment
        assert!((Point::new(5.0, 3.0).distance_to_segment(a, b) - 3.0).abs() < 1e-9);
        // Beyond the endpoint, distance is to the endpoint itself
        assert!((Point::new(13.0, 4.0).distance_to_segment(a, b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_connection_other_endpoint() {
        let conn = Connection {
            id: 1,
            endpoints: ("Router_1".to_string(), "Switch_1".to_string()),
            link_type: LinkType::Ethernet,
        };
        assert!(conn.touches("Router_1"));
        assert!(!conn.touches("Laptop_1"));
        assert_eq!(conn.other_endpoint("Router_1"), Some("Switch_1"));
        assert_eq!(conn.other_endpoint("Switch_1"), Some("Router_1"));
        assert_eq!(conn.other_endpoint("Laptop_1"), None);
    }
}
