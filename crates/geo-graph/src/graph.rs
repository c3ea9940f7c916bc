//! Graph data model for geocoded locations.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Display size attached to every node for downstream rendering.
pub const NODE_SIZE: u32 = 15;

/// Type string exported for the fallback edge.
pub const ARBITRARY_CONNECTION: &str = "arbitrary_connection";

/// Undirected attributed graph: locations keyed by name, edges between
/// locations that share a place type.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationGraph {
    /// Nodes in insertion order.
    nodes: Vec<LocationNode>,
    edges: Vec<LocationEdge>,
    /// Performance index: node name → position in `nodes`.
    #[serde(skip)]
    node_index: HashMap<String, usize>,
    /// Performance index: normalized (min, max) name pair → position in `edges`.
    #[serde(skip)]
    edge_index: HashMap<(String, String), usize>,
}

/// A location with valid coordinates (graph node).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationNode {
    /// Node identity: the location name.
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Human-readable label: "name (type)".
    pub title: String,
    pub size: u32,
}

impl LocationNode {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64, kind: Option<String>) -> Self {
        let id = id.into();
        let title = format!("{} ({})", id, kind.as_deref().unwrap_or("unknown"));
        Self {
            id,
            latitude,
            longitude,
            kind,
            title,
            size: NODE_SIZE,
        }
    }
}

/// An undirected edge. `source`/`target` keep the order they were added in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationEdge {
    pub source: String,
    pub target: String,
    pub relation: EdgeRelation,
}

impl LocationEdge {
    /// Whether this edge joins `a` and `b`, in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Why two locations are connected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRelation {
    /// Both locations have this place type.
    SameType(String),
    /// Fallback link so a multi-node graph is never edgeless.
    Arbitrary,
}

impl EdgeRelation {
    /// The exported `type` attribute.
    pub fn type_name(&self) -> &str {
        match self {
            Self::SameType(kind) => kind,
            Self::Arbitrary => ARBITRARY_CONNECTION,
        }
    }

    /// The exported `weight` attribute.
    pub fn weight(&self) -> u32 {
        match self {
            Self::SameType(_) => 2,
            Self::Arbitrary => 1,
        }
    }
}

/// Aggregate counts for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub same_type_edges: usize,
    pub arbitrary_edges: usize,
    /// Node count per place type; untyped nodes are not listed.
    pub types: BTreeMap<String, usize>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl LocationGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or overwrite the attributes of an existing node with
    /// the same id. An overwritten node keeps its original position.
    pub fn upsert_node(&mut self, node: LocationNode) {
        match self.node_index.get(&node.id) {
            Some(&idx) => self.nodes[idx] = node,
            None => {
                self.node_index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Connect two existing, distinct nodes.
    ///
    /// Returns `true` if a new edge was created. Connecting an already
    /// connected pair replaces its relation and returns `false`; self-loops
    /// and unknown endpoints are ignored.
    pub fn add_edge(&mut self, a: &str, b: &str, relation: EdgeRelation) -> bool {
        if a == b || !self.contains_node(a) || !self.contains_node(b) {
            return false;
        }
        let key = pair_key(a, b);
        if let Some(&idx) = self.edge_index.get(&key) {
            self.edges[idx].relation = relation;
            return false;
        }
        self.edge_index.insert(key, self.edges.len());
        self.edges.push(LocationEdge {
            source: a.to_string(),
            target: b.to_string(),
            relation,
        });
        true
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&LocationNode> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[LocationNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LocationEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edge joining `a` and `b`, if any.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&LocationEdge> {
        self.edge_index
            .get(&pair_key(a, b))
            .map(|&idx| &self.edges[idx])
    }

    /// Node ids grouped by place type (ascending type, insertion order within).
    pub fn nodes_by_type(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for node in &self.nodes {
            if let Some(kind) = node.kind.as_deref() {
                groups.entry(kind).or_default().push(node.id.as_str());
            }
        }
        groups
    }

    pub fn stats(&self) -> GraphStats {
        let arbitrary_edges = self
            .edges
            .iter()
            .filter(|e| e.relation == EdgeRelation::Arbitrary)
            .count();
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            same_type_edges: self.edges.len() - arbitrary_edges,
            arbitrary_edges,
            types: self
                .nodes_by_type()
                .into_iter()
                .map(|(kind, ids)| (kind.to_string(), ids.len()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, kind: &str) -> LocationNode {
        LocationNode::new(id, 1.0, 2.0, Some(kind.to_string()))
    }

    #[test]
    fn test_node_title_and_size() {
        let n = node("MoMA", "museum");
        assert_eq!(n.title, "MoMA (museum)");
        assert_eq!(n.size, NODE_SIZE);

        let untyped = LocationNode::new("X", 0.0, 0.0, None);
        assert_eq!(untyped.title, "X (unknown)");
    }

    #[test]
    fn test_upsert_overwrites_in_place() {
        let mut g = LocationGraph::new();
        g.upsert_node(node("A", "museum"));
        g.upsert_node(node("B", "park"));
        g.upsert_node(LocationNode::new("A", 9.0, 9.0, Some("zoo".to_string())));

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.nodes()[0].id, "A");
        assert_eq!(g.node("A").unwrap().latitude, 9.0);
        assert_eq!(g.node("A").unwrap().title, "A (zoo)");
    }

    #[test]
    fn test_add_edge_rejects_self_loops_and_unknown_nodes() {
        let mut g = LocationGraph::new();
        g.upsert_node(node("A", "museum"));
        assert!(!g.add_edge("A", "A", EdgeRelation::Arbitrary));
        assert!(!g.add_edge("A", "Z", EdgeRelation::Arbitrary));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_add_edge_is_undirected_and_deduplicated() {
        let mut g = LocationGraph::new();
        g.upsert_node(node("A", "museum"));
        g.upsert_node(node("B", "museum"));

        assert!(g.add_edge("A", "B", EdgeRelation::Arbitrary));
        assert!(!g.add_edge("B", "A", EdgeRelation::SameType("museum".to_string())));
        assert_eq!(g.edge_count(), 1);

        let e = g.edge_between("B", "A").unwrap();
        assert!(e.connects("A", "B"));
        assert_eq!(e.relation.type_name(), "museum");
        assert_eq!(e.relation.weight(), 2);
    }

    #[test]
    fn test_relation_attributes() {
        assert_eq!(EdgeRelation::Arbitrary.type_name(), "arbitrary_connection");
        assert_eq!(EdgeRelation::Arbitrary.weight(), 1);
        assert_eq!(EdgeRelation::SameType("park".into()).weight(), 2);
    }

    #[test]
    fn test_stats_counts_types() {
        let mut g = LocationGraph::new();
        g.upsert_node(node("A", "museum"));
        g.upsert_node(node("B", "museum"));
        g.upsert_node(LocationNode::new("C", 0.0, 0.0, None));
        g.add_edge("A", "B", EdgeRelation::SameType("museum".to_string()));

        let stats = g.stats();
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.same_type_edges, 1);
        assert_eq!(stats.arbitrary_edges, 0);
        assert_eq!(stats.types.get("museum"), Some(&2));
        assert_eq!(stats.types.len(), 1);
    }
}
