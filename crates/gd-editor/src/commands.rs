//! Graph commands.
//!
//! Every change to the graph, whether it comes from the interaction
//! controller, a toolbar toggle, or an import, is expressed as a
//! `GraphCommand` and applied through [`execute`]. The enum is matched
//! exhaustively, so adding a command without handling it does not compile.

use gd_core::store::{GraphStore, Mode};
use gd_core::{Edge, EdgeId, Graph, GraphResult, NodeId};
use smallvec::SmallVec;

/// A mutation request against a [`GraphStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum GraphCommand {
    AddNode {
        x: f64,
        y: f64,
    },
    MoveNode {
        id: NodeId,
        x: f64,
        y: f64,
    },
    /// Cascades to every incident edge.
    DeleteNode {
        id: NodeId,
    },
    AddEdge {
        u: NodeId,
        v: NodeId,
        w: f64,
    },
    DeleteEdge {
        id: EdgeId,
    },
    SetEdgeWeight {
        id: EdgeId,
        w: f64,
    },
    SetMode {
        mode: Mode,
        value: bool,
    },
    /// Install a whole graph (import). Validated as a unit.
    Replace {
        graph: Box<Graph>,
    },
    /// Install the blank graph ("New").
    Reset,
}

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Done,
    NodeAdded(NodeId),
    EdgeAdded(EdgeId),
    NodeDeleted {
        id: NodeId,
        cascaded: SmallVec<[EdgeId; 8]>,
    },
    EdgeDeleted(Edge),
}

impl GraphCommand {
    /// Short human-readable label, for logs.
    pub fn description(&self) -> &'static str {
        match self {
            GraphCommand::AddNode { .. } => "add node",
            GraphCommand::MoveNode { .. } => "move node",
            GraphCommand::DeleteNode { .. } => "delete node",
            GraphCommand::AddEdge { .. } => "add edge",
            GraphCommand::DeleteEdge { .. } => "delete edge",
            GraphCommand::SetEdgeWeight { .. } => "set edge weight",
            GraphCommand::SetMode { .. } => "set mode",
            GraphCommand::Replace { .. } => "replace graph",
            GraphCommand::Reset => "reset graph",
        }
    }
}

/// Apply `command` to `store`. On error the store is unchanged.
pub fn execute(store: &mut GraphStore, command: GraphCommand) -> GraphResult<CommandOutput> {
    let description = command.description();
    let result = match command {
        GraphCommand::AddNode { x, y } => store.add_node(x, y).map(CommandOutput::NodeAdded),
        GraphCommand::MoveNode { id, x, y } => {
            store.move_node(id, x, y).map(|()| CommandOutput::Done)
        }
        GraphCommand::DeleteNode { id } => store
            .delete_node(id)
            .map(|cascaded| CommandOutput::NodeDeleted { id, cascaded }),
        GraphCommand::AddEdge { u, v, w } => store.add_edge(u, v, w).map(CommandOutput::EdgeAdded),
        GraphCommand::DeleteEdge { id } => store.delete_edge(id).map(CommandOutput::EdgeDeleted),
        GraphCommand::SetEdgeWeight { id, w } => {
            store.set_edge_weight(id, w).map(|()| CommandOutput::Done)
        }
        GraphCommand::SetMode { mode, value } => {
            store.set_mode(mode, value).map(|()| CommandOutput::Done)
        }
        GraphCommand::Replace { graph } => store.replace(*graph).map(|()| CommandOutput::Done),
        GraphCommand::Reset => {
            store.reset();
            Ok(CommandOutput::Done)
        }
    };
    if let Err(err) = &result {
        log::warn!("{description} rejected: {err}");
    }
    result
}
