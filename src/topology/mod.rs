//! Topology store: entity types and the aggregate root.
//!
//! Pure data plus invariant enforcement; no rendering concerns.

pub mod store;
pub mod types;

pub use store::{GraphEdge, GraphNode, GraphView, Hit, Topology};
pub use types::{Connection, ConnectionId, Device, DeviceType, LinkType, Point};
