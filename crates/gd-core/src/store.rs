//! The single mutation surface over a [`Graph`].
//!
//! `GraphStore` owns the canonical graph together with its
//! [`EdgeUniquenessIndex`]. Every operation validates first and mutates
//! second, so a rejected call leaves both untouched, and every edge
//! insertion or removal updates graph and index in the same call.

use crate::error::{GraphError, GraphResult, IdKind};
use crate::id::{EdgeId, NodeId};
use crate::index::EdgeUniquenessIndex;
use crate::model::{Edge, Graph, Node};
use crate::validate::{check_finite, validate_graph};
use smallvec::SmallVec;

/// The two boolean flags a graph carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Weighted,
    Directed,
}

#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    graph: Graph,
    index: EdgeUniquenessIndex,
}

impl GraphStore {
    /// A store holding the blank graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `graph`, after full validation.
    pub fn from_graph(graph: Graph) -> GraphResult<Self> {
        let index = validate_graph(&graph)?;
        Ok(Self { graph, index })
    }

    /// Read-only view of the canonical graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn index(&self) -> &EdgeUniquenessIndex {
        &self.index
    }

    /// Give up ownership of the graph, discarding the index.
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Create a node at `(x, y)` under the next node id.
    ///
    /// # Errors
    /// `NonFinite` for a NaN or infinite coordinate, `IdsExhausted` once the
    /// node counter cannot advance.
    pub fn add_node(&mut self, x: f64, y: f64) -> GraphResult<NodeId> {
        check_finite("x", x)?;
        check_finite("y", y)?;
        let id = self.graph.next_node_id;
        let next = id
            .checked_next()
            .ok_or(GraphError::IdsExhausted(IdKind::Node))?;
        self.graph.nodes.insert(id, Node::new(id, x, y));
        self.graph.next_node_id = next;
        log::debug!("add node {id:?} at ({x}, {y})");
        Ok(id)
    }

    pub fn move_node(&mut self, id: NodeId, x: f64, y: f64) -> GraphResult<()> {
        let node = self
            .graph
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?;
        check_finite("x", x)?;
        check_finite("y", y)?;
        node.x = x;
        node.y = y;
        log::trace!("move node {id:?} to ({x}, {y})");
        Ok(())
    }

    /// Delete a node and, first, every edge touching it. Returns the ids of
    /// the edges removed by the cascade.
    pub fn delete_node(&mut self, id: NodeId) -> GraphResult<SmallVec<[EdgeId; 8]>> {
        if !self.graph.nodes.contains_key(&id) {
            return Err(GraphError::NodeNotFound(id));
        }
        let incident: SmallVec<[EdgeId; 8]> =
            self.graph.incident_edges(id).map(|e| e.id).collect();
        for &edge in &incident {
            self.delete_edge(edge)?;
        }
        self.graph.nodes.remove(&id);
        log::debug!("delete node {id:?} ({} incident edges)", incident.len());
        Ok(incident)
    }

    // ─── Edges ───────────────────────────────────────────────────────────

    /// Create an edge `u → v` with weight `w`.
    ///
    /// # Errors
    /// `SelfLoop`, `NodeNotFound`, `DuplicateEdge`, or, for undirected
    /// graphs, `AntiparallelNotAllowed` when `v → u` already exists. Then
    /// `NonFinite` for a NaN or infinite weight and `IdsExhausted` once the
    /// edge counter cannot advance.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, w: f64) -> GraphResult<EdgeId> {
        self.check_new_edge(u, v)?;
        check_finite("w", w)?;
        let id = self.graph.next_edge_id;
        let next = id
            .checked_next()
            .ok_or(GraphError::IdsExhausted(IdKind::Edge))?;
        self.graph.edges.insert(id, Edge::new(id, u, v, w));
        self.index.add(u, v);
        self.graph.next_edge_id = next;
        log::debug!("add edge {id:?}: {u:?} -> {v:?} (w = {w})");
        Ok(id)
    }

    /// Whether `add_edge(u, v, _)` would succeed, without mutating anything.
    pub fn check_new_edge(&self, u: NodeId, v: NodeId) -> GraphResult<()> {
        if u == v {
            return Err(GraphError::SelfLoop(u));
        }
        for node in [u, v] {
            if !self.graph.nodes.contains_key(&node) {
                return Err(GraphError::NodeNotFound(node));
            }
        }
        if self.index.exists(u, v) {
            return Err(GraphError::DuplicateEdge { u, v });
        }
        if !self.graph.is_directed && self.index.exists(v, u) {
            return Err(GraphError::AntiparallelNotAllowed { u, v });
        }
        Ok(())
    }

    pub fn delete_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge = self
            .graph
            .edges
            .remove(&id)
            .ok_or(GraphError::EdgeNotFound(id))?;
        self.index.remove(edge.u, edge.v);
        log::debug!("delete edge {id:?}: {:?} -> {:?}", edge.u, edge.v);
        Ok(edge)
    }

    pub fn set_edge_weight(&mut self, id: EdgeId, w: f64) -> GraphResult<()> {
        let edge = self
            .graph
            .edges
            .get_mut(&id)
            .ok_or(GraphError::EdgeNotFound(id))?;
        check_finite("w", w)?;
        edge.w = w;
        log::debug!("set weight of edge {id:?} to {w}");
        Ok(())
    }

    /// Whether the edge has an antiparallel twin, i.e. `v → u` also exists.
    /// Backs curved-edge rendering: hosts draw both edges of such a pair
    /// curved so they do not overlap.
    pub fn has_reverse(&self, id: EdgeId) -> bool {
        self.graph
            .edges
            .get(&id)
            .is_some_and(|e| self.index.has_antiparallel(e.u, e.v))
    }

    // ─── Modes ───────────────────────────────────────────────────────────

    /// Set one of the graph's flags.
    ///
    /// # Errors
    /// Switching to undirected fails with `AntiparallelConflict` while any
    /// antiparallel pair exists; the flag is left unchanged.
    pub fn set_mode(&mut self, mode: Mode, value: bool) -> GraphResult<()> {
        match mode {
            Mode::Weighted => self.graph.is_weighted = value,
            Mode::Directed => {
                if !value
                    && self.graph.is_directed
                    && let Some((u, v)) = self.index.find_antiparallel()
                {
                    return Err(GraphError::AntiparallelConflict { u, v });
                }
                self.graph.is_directed = value;
            }
        }
        log::debug!("set {mode:?} = {value}");
        Ok(())
    }

    // ─── Wholesale ───────────────────────────────────────────────────────

    /// Install `graph` in place of the current one. All-or-nothing: on
    /// error the previous graph and index are kept.
    pub fn replace(&mut self, graph: Graph) -> GraphResult<()> {
        let index = validate_graph(&graph).inspect_err(|err| {
            log::warn!("rejected graph replacement: {err}");
        })?;
        log::debug!(
            "replace graph ({} nodes, {} edges)",
            graph.node_count(),
            graph.edge_count()
        );
        self.graph = graph;
        self.index = index;
        Ok(())
    }

    /// Install the blank graph.
    pub fn reset(&mut self) {
        self.graph = Graph::blank();
        self.index.clear();
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_WEIGHT;
    use pretty_assertions::assert_eq;

    fn store_with(n: usize) -> (GraphStore, Vec<NodeId>) {
        let mut store = GraphStore::new();
        let ids = (0..n)
            .map(|i| store.add_node(i as f64 * 40.0, 20.0).unwrap())
            .collect();
        (store, ids)
    }

    fn index_matches_edges(store: &GraphStore) -> bool {
        store.index().len() == store.graph().edge_count()
            && store
                .graph()
                .edges
                .values()
                .all(|e| store.index().exists(e.u, e.v))
    }

    #[test]
    fn node_ids_are_never_reused() {
        let (mut store, ids) = store_with(2);
        store.delete_node(ids[1]).unwrap();
        let c = store.add_node(0.0, 0.0).unwrap();
        assert_eq!(c, NodeId(2));
        assert_eq!(store.graph().next_node_id, NodeId(3));
    }

    #[test]
    fn move_node_overwrites_position() {
        let (mut store, ids) = store_with(1);
        store.move_node(ids[0], 7.5, -3.0).unwrap();
        assert_eq!(store.graph().node(ids[0]).unwrap().position(), (7.5, -3.0));
        assert_eq!(
            store.move_node(NodeId(42), 0.0, 0.0),
            Err(GraphError::NodeNotFound(NodeId(42)))
        );
    }

    #[test]
    fn self_loop_rejected_for_every_node() {
        let (mut store, ids) = store_with(3);
        for id in ids {
            assert_eq!(
                store.add_edge(id, id, DEFAULT_WEIGHT),
                Err(GraphError::SelfLoop(id))
            );
        }
        assert_eq!(store.graph().edge_count(), 0);
        assert_eq!(store.graph().next_edge_id, EdgeId(0));
    }

    #[test]
    fn missing_endpoint_rejected() {
        let (mut store, ids) = store_with(1);
        assert_eq!(
            store.add_edge(ids[0], NodeId(9), DEFAULT_WEIGHT),
            Err(GraphError::NodeNotFound(NodeId(9)))
        );
    }

    #[test]
    fn duplicate_and_antiparallel_undirected() {
        let (mut store, ids) = store_with(2);
        let (a, b) = (ids[0], ids[1]);
        store.add_edge(a, b, DEFAULT_WEIGHT).unwrap();
        assert_eq!(
            store.add_edge(a, b, DEFAULT_WEIGHT),
            Err(GraphError::DuplicateEdge { u: a, v: b })
        );
        assert_eq!(
            store.add_edge(b, a, DEFAULT_WEIGHT),
            Err(GraphError::AntiparallelNotAllowed { u: b, v: a })
        );
        assert_eq!(store.graph().edge_count(), 1);
        assert!(index_matches_edges(&store));
    }

    #[test]
    fn antiparallel_allowed_when_directed() {
        let (mut store, ids) = store_with(2);
        let (a, b) = (ids[0], ids[1]);
        store.set_mode(Mode::Directed, true).unwrap();
        let ab = store.add_edge(a, b, DEFAULT_WEIGHT).unwrap();
        let ba = store.add_edge(b, a, DEFAULT_WEIGHT).unwrap();
        assert!(store.has_reverse(ab));
        assert!(store.has_reverse(ba));
        assert!(index_matches_edges(&store));
    }

    #[test]
    fn undirected_toggle_guarded_by_antiparallel_pairs() {
        let (mut store, ids) = store_with(2);
        let (a, b) = (ids[0], ids[1]);
        store.set_mode(Mode::Directed, true).unwrap();
        store.add_edge(a, b, DEFAULT_WEIGHT).unwrap();
        let ba = store.add_edge(b, a, DEFAULT_WEIGHT).unwrap();

        assert_eq!(
            store.set_mode(Mode::Directed, false),
            Err(GraphError::AntiparallelConflict { u: a, v: b })
        );
        assert!(store.graph().is_directed);

        store.delete_edge(ba).unwrap();
        store.set_mode(Mode::Directed, false).unwrap();
        assert!(!store.graph().is_directed);
    }

    #[test]
    fn weighted_toggle_keeps_weights() {
        let (mut store, ids) = store_with(2);
        let e = store.add_edge(ids[0], ids[1], DEFAULT_WEIGHT).unwrap();
        store.set_mode(Mode::Weighted, true).unwrap();
        store.set_edge_weight(e, 12.5).unwrap();
        store.set_mode(Mode::Weighted, false).unwrap();
        assert_eq!(store.graph().edge(e).unwrap().w, 12.5);
    }

    #[test]
    fn delete_node_cascades_to_incident_edges() {
        let (mut store, ids) = store_with(3);
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        store.add_edge(a, b, DEFAULT_WEIGHT).unwrap();
        store.add_edge(b, c, DEFAULT_WEIGHT).unwrap();

        let removed = store.delete_node(b).unwrap();
        assert_eq!(removed.as_slice(), &[EdgeId(0), EdgeId(1)]);
        let remaining: Vec<NodeId> = store.graph().nodes.keys().copied().collect();
        assert_eq!(remaining, vec![a, c]);
        assert_eq!(store.graph().edge_count(), 0);
        assert!(store.index().is_empty());

        // The freed pair can be connected again.
        store.add_edge(a, c, DEFAULT_WEIGHT).unwrap();
    }

    #[test]
    fn deleting_twice_is_not_found_and_harmless() {
        let (mut store, ids) = store_with(2);
        let e = store.add_edge(ids[0], ids[1], DEFAULT_WEIGHT).unwrap();
        store.delete_edge(e).unwrap();
        let before = store.graph().clone();
        assert_eq!(store.delete_edge(e), Err(GraphError::EdgeNotFound(e)));
        store.delete_node(ids[0]).unwrap();
        assert_eq!(
            store.delete_node(ids[0]),
            Err(GraphError::NodeNotFound(ids[0]))
        );
        assert_eq!(store.graph().node_count(), before.node_count() - 1);
        assert_eq!(store.graph().next_edge_id, before.next_edge_id);
    }

    #[test]
    fn replace_is_atomic() {
        let (mut store, ids) = store_with(2);
        store.add_edge(ids[0], ids[1], DEFAULT_WEIGHT).unwrap();
        let before = store.graph().clone();

        let mut bad = Graph::blank();
        bad.nodes.insert(NodeId(0), Node::new(NodeId(0), 1.0, 1.0));
        bad.edges
            .insert(EdgeId(0), Edge::new(EdgeId(0), NodeId(0), NodeId(5), 1.0));
        bad.next_node_id = NodeId(1);
        bad.next_edge_id = EdgeId(1);

        assert!(store.replace(bad).is_err());
        assert_eq!(store.graph(), &before);
        assert!(index_matches_edges(&store));
    }

    #[test]
    fn replace_rebuilds_index() {
        let (mut store, ids) = store_with(2);
        store.add_edge(ids[0], ids[1], DEFAULT_WEIGHT).unwrap();

        let (mut other, other_ids) = store_with(3);
        other.set_mode(Mode::Directed, true).unwrap();
        other
            .add_edge(other_ids[2], other_ids[0], DEFAULT_WEIGHT)
            .unwrap();

        store.replace(other.into_graph()).unwrap();
        assert!(store.graph().is_directed);
        assert!(!store.index().exists(ids[0], ids[1]));
        assert!(store.index().exists(NodeId(2), NodeId(0)));
        assert!(index_matches_edges(&store));
    }

    #[test]
    fn reset_returns_to_blank() {
        let (mut store, ids) = store_with(2);
        store.add_edge(ids[0], ids[1], DEFAULT_WEIGHT).unwrap();
        store.reset();
        assert_eq!(store.graph(), &Graph::blank());
        assert!(store.index().is_empty());
    }

    #[test]
    fn exhausted_counters_fail_without_wrapping() {
        let (mut store, ids) = store_with(2);
        let mut graph = store.graph().clone();
        graph.next_node_id = NodeId(u64::MAX);
        graph.next_edge_id = EdgeId(u64::MAX);
        store.replace(graph).unwrap();
        let before = store.graph().clone();

        assert_eq!(
            store.add_node(5.0, 5.0),
            Err(GraphError::IdsExhausted(IdKind::Node))
        );
        assert_eq!(
            store.add_edge(ids[0], ids[1], DEFAULT_WEIGHT),
            Err(GraphError::IdsExhausted(IdKind::Edge))
        );
        assert_eq!(store.graph(), &before);
        assert!(store.index().is_empty());
    }

    #[test]
    fn non_finite_values_rejected_at_every_entry() {
        let (mut store, ids) = store_with(2);
        let e = store.add_edge(ids[0], ids[1], DEFAULT_WEIGHT).unwrap();
        let before = store.graph().clone();

        assert_eq!(
            store.add_node(f64::NAN, 0.0),
            Err(GraphError::NonFinite { field: "x" })
        );
        assert_eq!(
            store.move_node(ids[0], 0.0, f64::INFINITY),
            Err(GraphError::NonFinite { field: "y" })
        );
        assert_eq!(
            store.set_edge_weight(e, f64::NAN),
            Err(GraphError::NonFinite { field: "w" })
        );
        store.delete_edge(e).unwrap();
        assert_eq!(
            store.add_edge(ids[0], ids[1], f64::NEG_INFINITY),
            Err(GraphError::NonFinite { field: "w" })
        );
        store.add_edge(ids[0], ids[1], DEFAULT_WEIGHT).unwrap();

        assert_eq!(store.graph().nodes, before.nodes);
        assert_eq!(store.graph().next_node_id, before.next_node_id);
        // One id for the deleted edge and one for its replacement.
        assert_eq!(store.graph().next_edge_id, EdgeId(2));
    }
}
