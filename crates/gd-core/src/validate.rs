//! Whole-graph invariant checks.
//!
//! Run before a graph is installed wholesale (import, reset). Each rule
//! inspects the candidate without modifying it; the first violation wins.
//! On success the derived pair index is returned so the caller does not
//! have to build it twice.

use crate::error::{GraphError, GraphResult, IdKind};
use crate::index::EdgeUniquenessIndex;
use crate::model::Graph;

// ─── Public API ───────────────────────────────────────────────────────────

/// Check every structural invariant of `graph`:
///
/// - map keys agree with the ids stored in each value
/// - coordinates and weights are finite
/// - every id is below its counter, so future allocations cannot collide
/// - every edge endpoint is an existing node
/// - no self-loops
/// - no two edges share an ordered endpoint pair
/// - undirected graphs contain no antiparallel pair
pub fn validate_graph(graph: &Graph) -> GraphResult<EdgeUniquenessIndex> {
    check_keys(graph)?;
    check_values(graph)?;
    check_counters(graph)?;
    check_endpoints(graph)?;
    let index = EdgeUniquenessIndex::from_edges(graph.edges.values())
        .map_err(|(u, v)| GraphError::DuplicateEdge { u, v })?;
    check_direction(graph, &index)?;
    Ok(index)
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn check_keys(graph: &Graph) -> GraphResult<()> {
    if let Some((key, node)) = graph.nodes.iter().find(|(key, node)| **key != node.id) {
        return Err(GraphError::MalformedDocument(format!(
            "node stored under key {key} carries id {}",
            node.id
        )));
    }
    if let Some((key, edge)) = graph.edges.iter().find(|(key, edge)| **key != edge.id) {
        return Err(GraphError::MalformedDocument(format!(
            "edge stored under key {key} carries id {}",
            edge.id
        )));
    }
    Ok(())
}

/// JSON has no spelling for NaN or infinity, so such a value could be
/// stored but never exported and read back.
pub(crate) fn check_finite(field: &'static str, value: f64) -> GraphResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GraphError::NonFinite { field })
    }
}

fn check_values(graph: &Graph) -> GraphResult<()> {
    for node in graph.nodes.values() {
        check_finite("x", node.x)?;
        check_finite("y", node.y)?;
    }
    for edge in graph.edges.values() {
        check_finite("w", edge.w)?;
    }
    Ok(())
}

fn check_counters(graph: &Graph) -> GraphResult<()> {
    // Maps are ordered, so the last key is the largest id.
    if let Some(&id) = graph.nodes.keys().next_back()
        && id >= graph.next_node_id
    {
        return Err(GraphError::IdBeyondCounter {
            kind: IdKind::Node,
            id: id.get(),
            next: graph.next_node_id.get(),
        });
    }
    if let Some(&id) = graph.edges.keys().next_back()
        && id >= graph.next_edge_id
    {
        return Err(GraphError::IdBeyondCounter {
            kind: IdKind::Edge,
            id: id.get(),
            next: graph.next_edge_id.get(),
        });
    }
    Ok(())
}

fn check_endpoints(graph: &Graph) -> GraphResult<()> {
    for edge in graph.edges.values() {
        for node in [edge.u, edge.v] {
            if !graph.nodes.contains_key(&node) {
                return Err(GraphError::DanglingEdge {
                    edge: edge.id,
                    node,
                });
            }
        }
        if edge.u == edge.v {
            return Err(GraphError::SelfLoop(edge.u));
        }
    }
    Ok(())
}

fn check_direction(graph: &Graph, index: &EdgeUniquenessIndex) -> GraphResult<()> {
    if graph.is_directed {
        return Ok(());
    }
    match index.find_antiparallel() {
        Some((u, v)) => Err(GraphError::AntiparallelNotAllowed { u, v }),
        None => Ok(()),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
