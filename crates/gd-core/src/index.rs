//! Ordered endpoint-pair index over the edge set.
//!
//! Holds one `(u, v)` entry per edge so duplicate and antiparallel checks
//! are a hash lookup each. The tuple is the key: `(u, v)` and `(v, u)` are
//! distinct entries.

use crate::id::NodeId;
use crate::model::Edge;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeUniquenessIndex {
    pairs: HashSet<(NodeId, NodeId)>,
}

impl EdgeUniquenessIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from scratch. Returns the first pair seen twice as `Err`, so a
    /// caller can reject graphs that break edge uniqueness.
    pub fn from_edges<'a>(
        edges: impl IntoIterator<Item = &'a Edge>,
    ) -> Result<Self, (NodeId, NodeId)> {
        let mut index = Self::new();
        for edge in edges {
            if !index.add(edge.u, edge.v) {
                return Err(edge.pair());
            }
        }
        Ok(index)
    }

    /// Replace the contents with the pairs of `edges`.
    pub fn rebuild<'a>(&mut self, edges: impl IntoIterator<Item = &'a Edge>) {
        self.pairs.clear();
        self.pairs.extend(edges.into_iter().map(Edge::pair));
    }

    /// Insert `(u, v)`. Returns `false` if it was already present.
    pub fn add(&mut self, u: NodeId, v: NodeId) -> bool {
        self.pairs.insert((u, v))
    }

    /// Remove `(u, v)`. Returns `false` if it was absent.
    pub fn remove(&mut self, u: NodeId, v: NodeId) -> bool {
        self.pairs.remove(&(u, v))
    }

    pub fn exists(&self, u: NodeId, v: NodeId) -> bool {
        self.pairs.contains(&(u, v))
    }

    /// True iff both `(u, v)` and `(v, u)` are present.
    pub fn has_antiparallel(&self, u: NodeId, v: NodeId) -> bool {
        self.exists(u, v) && self.exists(v, u)
    }

    /// Any pair whose reverse is also present, reported with the smaller id
    /// first so the answer does not depend on hash order.
    pub fn find_antiparallel(&self) -> Option<(NodeId, NodeId)> {
        self.pairs
            .iter()
            .filter(|&&(u, v)| u < v && self.exists(v, u))
            .min()
            .copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }
}
