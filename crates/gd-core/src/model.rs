//! Core data model for drawn graphs.
//!
//! A graph is a set of positioned nodes and a set of edges between them.
//! Edges never store coordinates: renderers resolve endpoint positions by
//! looking the nodes up, so moving a node needs no edge bookkeeping.
//! Two flags control how edges are interpreted: `is_weighted` and
//! `is_directed`.

use crate::id::{EdgeId, NodeId};
use std::collections::BTreeMap;

/// Weight given to edges created without an explicit one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

// ─── Nodes & Edges ───────────────────────────────────────────────────────

/// A positioned vertex, in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

impl Node {
    pub const fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// A connection from `u` to `v`. Endpoints are fixed for the edge's
/// lifetime; only the weight can change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub u: NodeId,
    pub v: NodeId,
    pub w: f64,
}

impl Edge {
    pub const fn new(id: EdgeId, u: NodeId, v: NodeId, w: f64) -> Self {
        Self { id, u, v, w }
    }

    /// The ordered endpoint pair.
    pub const fn pair(&self) -> (NodeId, NodeId) {
        (self.u, self.v)
    }

    /// Whether `node` is either endpoint.
    pub fn touches(&self, node: NodeId) -> bool {
        self.u == node || self.v == node
    }
}

// ─── Graph ───────────────────────────────────────────────────────────────

/// The canonical graph state: plain data, no derived indexes.
///
/// Maps are ordered by id so iteration (rendering, export, cascade delete)
/// is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub nodes: BTreeMap<NodeId, Node>,
    pub edges: BTreeMap<EdgeId, Edge>,
    pub next_node_id: NodeId,
    pub next_edge_id: EdgeId,
    pub is_weighted: bool,
    pub is_directed: bool,
}

impl Default for Graph {
    fn default() -> Self {
        Self::blank()
    }
}

impl Graph {
    /// An empty, unweighted, undirected graph with both counters at zero.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            next_node_id: NodeId(0),
            next_edge_id: EdgeId(0),
            is_weighted: false,
            is_directed: false,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Edges with `node` as either endpoint, in id order.
    pub fn incident_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values().filter(move |e| e.touches(node))
    }

    /// Both endpoint positions of an edge, for drawing.
    pub fn edge_endpoints(&self, id: EdgeId) -> Option<((f64, f64), (f64, f64))> {
        let edge = self.edges.get(&id)?;
        let from = self.nodes.get(&edge.u)?;
        let to = self.nodes.get(&edge.v)?;
        Some((from.position(), to.position()))
    }
}
