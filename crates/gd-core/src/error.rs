//! Error type shared by every graph operation.
//!
//! The `Display` text of each variant is the message shown to the user by
//! the host's notification layer. None of these are fatal: a rejected
//! operation leaves the graph exactly as it was.

use crate::id::{EdgeId, NodeId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error("Edge {0} does not exist")]
    EdgeNotFound(EdgeId),

    #[error("An edge cannot connect node {0} to itself")]
    SelfLoop(NodeId),

    #[error("Edge already exists!")]
    DuplicateEdge { u: NodeId, v: NodeId },

    #[error("Graph needs to be directed to add double edges!")]
    AntiparallelNotAllowed { u: NodeId, v: NodeId },

    #[error("There is a double edge, graph can't be undirected until double edges are removed")]
    AntiparallelConflict { u: NodeId, v: NodeId },

    #[error("Edge {edge} references missing node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },

    #[error("Id {id} is not below the next {kind} id {next}")]
    IdBeyondCounter {
        kind: IdKind,
        id: u64,
        next: u64,
    },

    #[error("No {0} ids left to allocate")]
    IdsExhausted(IdKind),

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("Malformed graph document: {0}")]
    MalformedDocument(String),
}

/// Which id space an id error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Node,
    Edge,
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IdKind::Node => "node",
            IdKind::Edge => "edge",
        })
    }
}

impl GraphError {
    /// Whether the error comes from a whole-document import rather than an
    /// interactive edit.
    pub fn is_import_error(&self) -> bool {
        matches!(
            self,
            GraphError::MalformedDocument(_)
                | GraphError::DanglingEdge { .. }
                | GraphError::IdBeyondCounter { .. }
        )
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
