//! Path resolution over the topology graph.
//!
//! Links are unweighted and undirected, so reachability and shortest path
//! are both a breadth-first search, O(V+E). Ties between equal-length
//! paths are broken by visit order: a device's neighbors are explored in
//! the insertion order of its connections.

use std::collections::{HashMap, VecDeque};

use crate::topology::Topology;

/// True iff `from` and `to` are connected by a path of zero or more edges.
/// A device is trivially reachable from itself; unknown ids are not
/// reachable from anything.
pub fn reachable(topology: &Topology, from: &str, to: &str) -> bool {
    shortest_path(topology, from, to).is_some()
}

/// Fewest-hop path from `from` to `to`, both endpoints inclusive.
///
/// Returns `None` when either id is unknown or no route exists.
/// `shortest_path(t, a, a)` is `Some([a])`.
pub fn shortest_path(topology: &Topology, from: &str, to: &str) -> Option<Vec<String>> {
    if topology.device(from).is_none() || topology.device(to).is_none() {
        return None;
    }
    if from == to {
        return Some(vec![from.to_string()]);
    }

    let mut parent: HashMap<String, String> = HashMap::new();
    let mut queue = VecDeque::from([from.to_string()]);
    parent.insert(from.to_string(), from.to_string());

    while let Some(current) = queue.pop_front() {
        for neighbor in topology.neighbors(&current) {
            if parent.contains_key(&neighbor) {
                continue;
            }
            parent.insert(neighbor.clone(), current.clone());
            if neighbor == to {
                return Some(walk_back(&parent, from, to));
            }
            queue.push_back(neighbor);
        }
    }
    None
}

/// Reconstruct the path by walking the parent map from `to` back to `from`
fn walk_back(parent: &HashMap<String, String>, from: &str, to: &str) -> Vec<String> {
    let mut path = vec![to.to_string()];
    let mut current = to;
    while current != from {
        current = &parent[current];
        path.push(current.to_string());
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{DeviceType, LinkType, Point};

    fn chain(n: usize) -> (Topology, Vec<String>) {
        let mut topo = Topology::new();
        let ids: Vec<String> = (0..n)
            .map(|i| {
                topo.add_device(DeviceType::Computer, Point::new(i as f64 * 100.0, 0.0))
                    .id
                    .clone()
            })
            .collect();
        for pair in ids.windows(2) {
            topo.add_connection(&pair[0], &pair[1], LinkType::Ethernet).unwrap();
        }
        (topo, ids)
    }

    #[test]
    fn test_self_path_is_single_node() {
        let (topo, ids) = chain(1);
        assert_eq!(shortest_path(&topo, &ids[0], &ids[0]), Some(vec![ids[0].clone()]));
        assert!(reachable(&topo, &ids[0], &ids[0]));
    }

    #[test]
    fn test_three_node_chain() {
        let (topo, ids) = chain(3);
        assert_eq!(shortest_path(&topo, &ids[0], &ids[2]), Some(ids.clone()));
    }

    #[test]
    fn test_disconnected_devices_are_unreachable() {
        let mut topo = Topology::new();
        let a = topo.add_device(DeviceType::Router, Point::new(0.0, 0.0)).id.clone();
        let b = topo.add_device(DeviceType::Router, Point::new(100.0, 0.0)).id.clone();
        assert_eq!(shortest_path(&topo, &a, &b), None);
        assert!(!reachable(&topo, &a, &b));
    }

    #[test]
    fn test_unknown_ids_resolve_to_no_path() {
        let (topo, ids) = chain(2);
        assert_eq!(shortest_path(&topo, &ids[0], "Server_7"), None);
        assert_eq!(shortest_path(&topo, "Server_7", &ids[0]), None);
        assert!(!reachable(&topo, "Server_7", "Server_8"));
    }

    #[test]
    fn test_ties_broken_by_connection_insertion_order() {
        // Two equal-length routes from source to sink; the route through
        // the neighbor whose connection was inserted first must win.
        let mut topo = Topology::new();
        let source = topo.add_device(DeviceType::Router, Point::new(0.0, 0.0)).id.clone();
        let upper = topo.add_device(DeviceType::Switch, Point::new(100.0, -50.0)).id.clone();
        let lower = topo.add_device(DeviceType::Switch, Point::new(100.0, 50.0)).id.clone();
        let sink = topo.add_device(DeviceType::Server, Point::new(200.0, 0.0)).id.clone();
        topo.add_connection(&source, &lower, LinkType::Ethernet).unwrap();
        topo.add_connection(&source, &upper, LinkType::Ethernet).unwrap();
        topo.add_connection(&upper, &sink, LinkType::Ethernet).unwrap();
        topo.add_connection(&lower, &sink, LinkType::Ethernet).unwrap();

        assert_eq!(
            shortest_path(&topo, &source, &sink),
            Some(vec![source, lower, sink])
        );
    }

    #[test]
    fn test_shortest_beats_longer_route() {
        // Triangle plus a detour: direct edge wins over two-hop route
        let mut topo = Topology::new();
        let a = topo.add_device(DeviceType::Router, Point::new(0.0, 0.0)).id.clone();
        let b = topo.add_device(DeviceType::Router, Point::new(100.0, 0.0)).id.clone();
        let c = topo.add_device(DeviceType::Router, Point::new(50.0, 80.0)).id.clone();
        topo.add_connection(&a, &c, LinkType::Ethernet).unwrap();
        topo.add_connection(&c, &b, LinkType::Ethernet).unwrap();
        topo.add_connection(&a, &b, LinkType::FiberOptic).unwrap();
        assert_eq!(shortest_path(&topo, &a, &b), Some(vec![a, b]));
    }
}
