// Directed dependency graph over resource addresses

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

#[derive(Debug, Clone, Copy)]
enum Direction {
    Incoming,
    Outgoing,
}

/// Adjacency for one node
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
struct NodeLinks {
    /// Prerequisites: targets of outgoing edges
    out: BTreeSet<String>,
    /// Dependents: sources of incoming edges
    r#in: BTreeSet<String>,
}

/// Directed graph where an edge A → B means A depends on prerequisite B.
///
/// Ordered maps keep every traversal and serialization deterministic.
/// Cycles in the input are tolerated: traversals use a visited set, so a
/// node is never counted twice.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, NodeLinks>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, address: &str) {
        self.nodes.entry(address.to_string()).or_default();
    }

    /// Insert the edge from → to. Self-loops are dropped, duplicates
    /// collapse, and both endpoints are materialized as nodes.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        self.add_node(from);
        self.add_node(to);
        if let Some(links) = self.nodes.get_mut(from) {
            links.out.insert(to.to_string());
        }
        if let Some(links) = self.nodes.get_mut(to) {
            links.r#in.insert(from.to_string());
        }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.nodes.contains_key(address)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|links| links.out.len()).sum()
    }

    /// Addresses in sorted order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Number of resources that declare a dependency on this node
    pub fn in_degree(&self, address: &str) -> usize {
        self.nodes.get(address).map_or(0, |links| links.r#in.len())
    }

    /// Direct dependents of a node (sources of incoming edges)
    pub fn dependents(&self, address: &str) -> impl Iterator<Item = &str> {
        self.nodes
            .get(address)
            .into_iter()
            .flat_map(|links| links.r#in.iter().map(String::as_str))
    }

    /// Direct prerequisites of a node (targets of outgoing edges)
    pub fn prerequisites(&self, address: &str) -> impl Iterator<Item = &str> {
        self.nodes
            .get(address)
            .into_iter()
            .flat_map(|links| links.out.iter().map(String::as_str))
    }

    /// All nodes from which `address` is reachable along dependency edges:
    /// the transitive dependents. BFS with a visited set; the start node is
    /// not included.
    pub fn downstream(&self, address: &str) -> BTreeSet<String> {
        self.reachable(address, Direction::Incoming)
    }

    /// All prerequisites reachable from `address` along outgoing edges
    pub fn upstream(&self, address: &str) -> BTreeSet<String> {
        self.reachable(address, Direction::Outgoing)
    }

    fn reachable(&self, start: &str, direction: Direction) -> BTreeSet<String> {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(start.to_string());

        while let Some(current) = queue.pop_front() {
            if let Some(links) = self.nodes.get(&current) {
                let next = match direction {
                    Direction::Incoming => &links.r#in,
                    Direction::Outgoing => &links.out,
                };
                for neighbor in next {
                    if neighbor != start && visited.insert(neighbor.clone()) {
                        queue.push_back(neighbor.clone());
                    }
                }
            }
        }

        visited
    }
}
