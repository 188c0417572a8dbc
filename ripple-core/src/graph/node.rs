//! Graph Nodes
//!
//! This module defines the key nodes that live in the key graph.

use smallvec::SmallVec;

use crate::util::Position;

/// Externally assigned key identifier (for example a HID usage code).
///
/// Ids are opaque to the core; they only serve to find a key's node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub u16);

impl KeyId {
    /// Get the raw id value.
    pub fn raw(&self) -> u16 {
        self.0
    }
}

impl From<u16> for KeyId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// Dense index of a key within its graph.
///
/// Indices are assigned in insertion order starting at zero and never change
/// for the lifetime of the graph. Frame buffers are indexed the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyIndex(usize);

impl KeyIndex {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index value.
    pub const fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for KeyIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Inline capacity for neighbor lists. A key on a grid layout touches at
/// most a handful of others, so the list almost never spills to the heap.
pub(crate) type NeighborList = SmallVec<[KeyIndex; 8]>;

/// A key in the graph.
#[derive(Debug, Clone)]
pub struct KeyNode {
    /// Stable position in the owning graph.
    index: KeyIndex,

    /// External identifier.
    id: KeyId,

    /// Center of the key on the layout.
    position: Position,

    /// Physically adjacent keys, by index into the same graph.
    neighbors: NeighborList,
}

impl KeyNode {
    pub(crate) fn new(index: KeyIndex, id: KeyId, position: Position) -> Self {
        Self {
            index,
            id,
            position,
            neighbors: NeighborList::new(),
        }
    }

    /// Get the node's index.
    pub fn index(&self) -> KeyIndex {
        self.index
    }

    /// Get the node's external id.
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// Get the node's position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Get all neighbors.
    pub fn neighbors(&self) -> &[KeyIndex] {
        &self.neighbors
    }

    /// Check whether `other` is adjacent to this node.
    pub fn is_neighbor(&self, other: KeyIndex) -> bool {
        self.neighbors.contains(&other)
    }

    /// Add a neighbor. Only the graph builder calls this.
    pub(crate) fn add_neighbor(&mut self, other: KeyIndex) {
        if other != self.index && !self.neighbors.contains(&other) {
            self.neighbors.push(other);
        }
    }
}
