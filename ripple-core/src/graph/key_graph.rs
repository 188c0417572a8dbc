//! Key Graph Construction
//!
//! Builds the immutable adjacency graph over a keyboard layout.
//!
//! # Algorithm
//!
//! Two keys are neighbors when the Manhattan distance between their centers
//! is strictly below a threshold slightly larger than one key unit:
//!
//! 1. Insert every key, assigning dense indices in input order
//! 2. Measure each unordered pair exactly once
//! 3. Record an edge in both directions when the pair is close enough
//!
//! Measuring each pair once and writing both directions keeps the relation
//! symmetric even if the distance computation were ever made asymmetric.
//! The pass is O(n²), which is fine for a single keyboard's worth of keys.

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::node::{KeyId, KeyIndex, KeyNode};
use crate::config::LightingConfig;
use crate::util::Position;

/// Default adjacency threshold in key units (exclusive).
pub const NEIGHBOR_THRESHOLD: f32 = 1.6;

/// The immutable key graph. Owns every node; everything else refers to keys
/// by [`KeyIndex`].
#[derive(Debug, Clone, Default)]
pub struct KeyGraph {
    /// All nodes, in index order, keyed by external id.
    nodes: IndexMap<KeyId, KeyNode>,

    /// Number of undirected edges.
    edge_count: usize,
}

impl KeyGraph {
    /// Build a graph using [`NEIGHBOR_THRESHOLD`].
    pub fn build<I, P>(keys: I) -> Self
    where
        I: IntoIterator<Item = (KeyId, P)>,
        P: Into<Position>,
    {
        Self::build_with_threshold(keys, NEIGHBOR_THRESHOLD)
    }

    /// Build a graph using the configured `neighbor_threshold`.
    pub fn from_config<I, P>(keys: I, config: &LightingConfig) -> Self
    where
        I: IntoIterator<Item = (KeyId, P)>,
        P: Into<Position>,
    {
        Self::build_with_threshold(keys, config.neighbor_threshold)
    }

    /// Build a graph with a custom adjacency threshold.
    ///
    /// If the same id appears more than once, the first occurrence wins.
    pub fn build_with_threshold<I, P>(keys: I, threshold: f32) -> Self
    where
        I: IntoIterator<Item = (KeyId, P)>,
        P: Into<Position>,
    {
        let keys = keys.into_iter();
        let mut nodes: IndexMap<KeyId, KeyNode> = IndexMap::with_capacity(keys.size_hint().0);

        for (id, position) in keys {
            if nodes.contains_key(&id) {
                warn!(key_id = id.raw(), "duplicate key id in layout, keeping the first");
                continue;
            }
            let index = KeyIndex::new(nodes.len());
            nodes.insert(id, KeyNode::new(index, id, position.into()));
        }

        let mut graph = Self { nodes, edge_count: 0 };
        graph.link_neighbors(threshold);

        debug!(
            keys = graph.len(),
            edges = graph.edge_count,
            threshold,
            "built key graph"
        );
        graph
    }

    fn link_neighbors(&mut self, threshold: f32) {
        let positions: Vec<Position> = self.nodes.values().map(KeyNode::position).collect();

        for a in 0..positions.len() {
            for b in (a + 1)..positions.len() {
                if positions[a].manhattan_distance(&positions[b]) < threshold {
                    self.add_edge(KeyIndex::new(a), KeyIndex::new(b));
                }
            }
        }
    }

    /// Add an undirected edge between two existing nodes.
    fn add_edge(&mut self, a: KeyIndex, b: KeyIndex) {
        if let Some((_, node)) = self.nodes.get_index_mut(a.get()) {
            node.add_neighbor(b);
        }
        if let Some((_, node)) = self.nodes.get_index_mut(b.get()) {
            node.add_neighbor(a);
        }
        self.edge_count += 1;
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of undirected adjacency edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether `index` names a key of this graph.
    pub fn contains(&self, index: KeyIndex) -> bool {
        index.get() < self.nodes.len()
    }

    /// Get a node by index.
    pub fn node(&self, index: KeyIndex) -> Option<&KeyNode> {
        self.nodes.get_index(index.get()).map(|(_, node)| node)
    }

    /// Find a node by its external id.
    pub fn find(&self, id: KeyId) -> Option<&KeyNode> {
        self.nodes.get(&id)
    }

    /// Index of the key with the given id.
    pub fn index_of(&self, id: KeyId) -> Option<KeyIndex> {
        self.nodes.get_index_of(&id).map(KeyIndex::new)
    }

    /// Neighbors of a key. Unknown indices have no neighbors.
    pub fn neighbors(&self, index: KeyIndex) -> &[KeyIndex] {
        self.node(index).map(KeyNode::neighbors).unwrap_or(&[])
    }

    /// All nodes in index order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &KeyNode> + '_ {
        self.nodes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(count: u16, spacing: f32) -> Vec<(KeyId, Position)> {
        (0..count)
            .map(|i| (KeyId(i), Position::new(f32::from(i) * spacing, 0.0)))
            .collect()
    }

    #[test]
    fn empty_layout_yields_empty_graph() {
        let graph = KeyGraph::build(Vec::<(KeyId, Position)>::new());
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn adjacent_keys_in_a_row_are_linked() {
        let graph = KeyGraph::build(row(4, 1.0));

        assert_eq!(graph.neighbors(KeyIndex::new(0)), &[KeyIndex::new(1)]);
        assert_eq!(
            graph.neighbors(KeyIndex::new(1)),
            &[KeyIndex::new(0), KeyIndex::new(2)]
        );
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn threshold_is_exclusive() {
        // Exactly 1.6 apart: not neighbors.
        let graph = KeyGraph::build(row(2, 1.6));
        assert!(graph.neighbors(KeyIndex::new(0)).is_empty());

        let graph = KeyGraph::build(row(2, 1.5));
        assert_eq!(graph.neighbors(KeyIndex::new(0)), &[KeyIndex::new(1)]);
    }

    #[test]
    fn diagonal_uses_manhattan_distance() {
        // Euclidean ~1.06 but Manhattan 1.5: still neighbors.
        // Euclidean ~1.41 but Manhattan 2.0: not neighbors.
        let graph = KeyGraph::build(vec![
            (KeyId(0), Position::new(0.0, 0.0)),
            (KeyId(1), Position::new(0.75, 0.75)),
            (KeyId(2), Position::new(1.0, 1.0)),
        ]);
        assert!(graph.node(KeyIndex::new(0)).unwrap().is_neighbor(KeyIndex::new(1)));
        assert!(!graph.node(KeyIndex::new(0)).unwrap().is_neighbor(KeyIndex::new(2)));
    }

    #[test]
    fn adjacency_is_symmetric_and_irreflexive() {
        let layout: Vec<(KeyId, Position)> = (0..5u16)
            .flat_map(|y| {
                (0..5u16).map(move |x| {
                    (
                        KeyId(y * 5 + x),
                        Position::new(f32::from(x), f32::from(y) * 1.25),
                    )
                })
            })
            .collect();
        let graph = KeyGraph::build(layout);

        for node in graph.nodes() {
            assert!(!node.is_neighbor(node.index()));
            for &other in node.neighbors() {
                assert!(graph.node(other).unwrap().is_neighbor(node.index()));
            }
        }
    }

    #[test]
    fn lookup_by_id_and_duplicates() {
        let graph = KeyGraph::build(vec![
            (KeyId(10), Position::new(0.0, 0.0)),
            (KeyId(20), Position::new(1.0, 0.0)),
            (KeyId(10), Position::new(5.0, 5.0)),
        ]);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.index_of(KeyId(20)), Some(KeyIndex::new(1)));
        assert_eq!(graph.find(KeyId(10)).unwrap().position(), Position::new(0.0, 0.0));
        assert!(graph.find(KeyId(99)).is_none());
        assert!(graph.neighbors(KeyIndex::new(42)).is_empty());
    }

    #[test]
    fn configured_threshold_controls_adjacency() {
        let tight = LightingConfig::from_json(r#"{"neighbor_threshold": 0.5}"#).unwrap();
        let graph = KeyGraph::from_config(row(2, 1.0), &tight);
        assert!(graph.neighbors(KeyIndex::new(0)).is_empty());
        assert_eq!(graph.edge_count(), 0);

        let wide = LightingConfig::from_json(r#"{"neighbor_threshold": 2.5}"#).unwrap();
        let graph = KeyGraph::from_config(row(3, 1.0), &wide);
        assert_eq!(
            graph.neighbors(KeyIndex::new(0)),
            &[KeyIndex::new(1), KeyIndex::new(2)]
        );

        let graph = KeyGraph::from_config(row(2, 1.0), &LightingConfig::default());
        assert_eq!(graph.neighbors(KeyIndex::new(0)), &[KeyIndex::new(1)]);
    }
}
