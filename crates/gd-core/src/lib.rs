pub mod document;
pub mod error;
pub mod id;
pub mod index;
pub mod model;
pub mod store;
pub mod validate;

pub use document::{ExportConfig, GraphDocument, export_graph, from_json, import_graph, to_json};
pub use error::{GraphError, GraphResult, IdKind};
pub use id::{EdgeId, NodeId};
pub use index::EdgeUniquenessIndex;
pub use model::*;
pub use store::{GraphStore, Mode};
pub use validate::validate_graph;
