//! Key Graph
//!
//! This module implements the adjacency graph over the physical key layout
//! that ripple effects propagate across.
//!
//! # Overview
//!
//! The key graph is an undirected graph where:
//!
//! - Nodes are keys, each with a stable dense index and a 2D position
//! - Edges connect keys that physically touch on the layout
//!
//! The graph is built once from an externally supplied layout and is
//! read-only afterwards. Effects and the lighting manager only ever hold
//! [`KeyIndex`] values into it, never node ownership.
//!
//! # Design Decisions
//!
//! 1. Adjacency uses Manhattan distance: it is cheap and on grid-aligned
//!    layouts it is a good enough proxy for "physically touching".
//!
//! 2. The graph is indexed by dense key index for O(1) lookups, and by
//!    external key id for input mapping.

mod key_graph;
mod node;

pub use key_graph::{KeyGraph, NEIGHBOR_THRESHOLD};
pub use node::{KeyId, KeyIndex, KeyNode};
