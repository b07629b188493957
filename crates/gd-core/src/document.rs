//! Portable JSON document for import and export.
//!
//! ```json
//! {
//!   "topNode": 2, "topEdge": 1, "isWeighted": false, "isDirected": false,
//!   "nodes": { "0": { "x": 10, "y": 20 }, "1": { "x": 80, "y": 20 } },
//!   "edges": { "0": { "u": 0, "v": 1, "w": 1 } }
//! }
//! ```
//!
//! Object keys are decimal ids. Import is lenient where older editor
//! output differs: missing flags default to `false`, a missing weight
//! defaults to 1, and edge endpoints may be written as strings (`"u": "0"`).
//! Structural problems become `MalformedDocument`; graph invariants are
//! checked afterwards by `GraphStore::replace`.

use crate::error::{GraphError, GraphResult};
use crate::id::{EdgeId, NodeId};
use crate::model::{DEFAULT_WEIGHT, Edge, Graph, Node};
use crate::store::GraphStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Multi-line output. Default: **true**.
    pub pretty: bool,
    /// Indentation unit for pretty output; must be JSON whitespace.
    /// Default: one tab.
    pub indent: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "\t".to_string(),
        }
    }
}

impl ExportConfig {
    /// Whether `indent` only holds the four JSON whitespace characters.
    pub fn indent_is_whitespace(&self) -> bool {
        self.indent
            .bytes()
            .all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
    }
}

// ─── Document types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    pub top_node: u64,
    pub top_edge: u64,
    #[serde(default)]
    pub is_weighted: bool,
    #[serde(default)]
    pub is_directed: bool,
    #[serde(with = "id_keys")]
    pub nodes: BTreeMap<NodeId, NodeEntry>,
    #[serde(with = "id_keys")]
    pub edges: BTreeMap<EdgeId, EdgeEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeEntry {
    #[serde(deserialize_with = "node_ref")]
    pub u: NodeId,
    #[serde(deserialize_with = "node_ref")]
    pub v: NodeId,
    #[serde(default = "default_weight")]
    pub w: f64,
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

// ─── Conversion ──────────────────────────────────────────────────────────

/// Structural copy of `graph`. The edge index is derived state and is not
/// part of the document.
pub fn export_graph(graph: &Graph) -> GraphDocument {
    GraphDocument {
        top_node: graph.next_node_id.get(),
        top_edge: graph.next_edge_id.get(),
        is_weighted: graph.is_weighted,
        is_directed: graph.is_directed,
        nodes: graph
            .nodes
            .values()
            .map(|n| (n.id, NodeEntry { x: n.x, y: n.y }))
            .collect(),
        edges: graph
            .edges
            .values()
            .map(|e| {
                (
                    e.id,
                    EdgeEntry {
                        u: e.u,
                        v: e.v,
                        w: e.w,
                    },
                )
            })
            .collect(),
    }
}

/// Build a graph from a parsed document. Does not check invariants; hand
/// the result to `GraphStore::replace` for that.
pub fn import_graph(doc: GraphDocument) -> Graph {
    Graph {
        nodes: doc
            .nodes
            .into_iter()
            .map(|(id, n)| (id, Node::new(id, n.x, n.y)))
            .collect(),
        edges: doc
            .edges
            .into_iter()
            .map(|(id, e)| (id, Edge::new(id, e.u, e.v, e.w)))
            .collect(),
        next_node_id: NodeId(doc.top_node),
        next_edge_id: EdgeId(doc.top_edge),
        is_weighted: doc.is_weighted,
        is_directed: doc.is_directed,
    }
}

/// Render `graph` as JSON text.
///
/// # Errors
/// Fails when `config.indent` holds anything but JSON whitespace, since the
/// output would not parse.
pub fn to_json(graph: &Graph, config: &ExportConfig) -> serde_json::Result<String> {
    let doc = export_graph(graph);
    if !config.pretty {
        return serde_json::to_string(&doc);
    }
    if !config.indent_is_whitespace() {
        return Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "export indent {:?} is not JSON whitespace",
            config.indent
        )));
    }
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(config.indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

/// Parse JSON text into a graph, without invariant checks.
///
/// # Errors
/// `MalformedDocument` when the text is not JSON or has the wrong shape.
pub fn from_json(text: &str) -> GraphResult<Graph> {
    let doc: GraphDocument = serde_json::from_str(text)
        .map_err(|err| GraphError::MalformedDocument(err.to_string()))?;
    Ok(import_graph(doc))
}

impl GraphStore {
    /// Parse `text` and install it. Either the whole document is accepted
    /// or the current graph is kept.
    pub fn import_json(&mut self, text: &str) -> GraphResult<()> {
        let graph = from_json(text).inspect_err(|err| {
            log::warn!("rejected import: {err}");
        })?;
        self.replace(graph)
    }

    pub fn export_json(&self, config: &ExportConfig) -> serde_json::Result<String> {
        to_json(self.graph(), config)
    }
}

// ─── Serde helpers ───────────────────────────────────────────────────────

/// Maps keyed by ids, written as JSON objects with decimal string keys.
/// Keys must be canonical (`"7"`, not `"07"` or `"+7"`) so two spellings
/// cannot name the same id.
mod id_keys {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Display,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_map(map.iter().map(|(k, v)| (k.to_string(), v)))
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: FromStr + Display + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, V>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, value)| {
                let id = key
                    .parse::<K>()
                    .ok()
                    .filter(|id| id.to_string() == key)
                    .ok_or_else(|| D::Error::custom(format!("invalid id key {key:?}")))?;
                Ok((id, value))
            })
            .collect()
    }
}

/// An edge endpoint: an integer id, or the same id as a decimal string.
fn node_ref<'de, D>(deserializer: D) -> Result<NodeId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(u64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Int(raw) => Ok(NodeId(raw)),
        Repr::Text(text) => text
            .parse::<NodeId>()
            .ok()
            .filter(|id| id.to_string() == text)
            .ok_or_else(|| D::Error::custom(format!("invalid node reference {text:?}"))),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn triangle() -> Graph {
        let mut store = GraphStore::new();
        let a = store.add_node(10.0, 20.0).unwrap();
        let b = store.add_node(80.5, 20.0).unwrap();
        let c = store.add_node(45.0, 90.0).unwrap();
        store.add_edge(a, b, 1.0).unwrap();
        store.add_edge(b, c, 2.5).unwrap();
        let ca = store.add_edge(c, a, 1.0).unwrap();
        store.delete_edge(ca).unwrap();
        store
            .set_mode(crate::store::Mode::Weighted, true)
            .unwrap();
        store.into_graph()
    }

    #[test]
    fn export_matches_wire_shape() {
        let json = to_json(&triangle(), &ExportConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["topNode"], 3);
        assert_eq!(value["topEdge"], 3);
        assert_eq!(value["isWeighted"], true);
        assert_eq!(value["isDirected"], false);
        assert_eq!(value["nodes"]["1"]["x"], 80.5);
        assert_eq!(value["edges"]["1"]["u"], 1);
        assert_eq!(value["edges"]["1"]["w"], 2.5);
        assert!(value["edges"].get("2").is_none());
        assert!(json.contains("\n\t\"topNode\""));
    }

    #[test]
    fn compact_export_is_single_line() {
        let config = ExportConfig {
            pretty: false,
            ..ExportConfig::default()
        };
        let json = to_json(&triangle(), &config).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn indent_must_be_json_whitespace() {
        let spaces = ExportConfig {
            indent: "  ".to_string(),
            ..ExportConfig::default()
        };
        let json = to_json(&triangle(), &spaces).unwrap();
        assert!(json.contains("\n  \"topNode\""));
        assert_eq!(from_json(&json).unwrap(), triangle());

        let dots = ExportConfig {
            indent: "..".to_string(),
            ..ExportConfig::default()
        };
        assert!(!dots.indent_is_whitespace());
        assert!(to_json(&triangle(), &dots).is_err());

        // Compact output ignores the indent.
        let compact = ExportConfig {
            pretty: false,
            ..dots
        };
        assert!(to_json(&triangle(), &compact).is_ok());
    }

    #[test]
    fn json_roundtrip_preserves_graph() {
        let graph = triangle();
        let json = to_json(&graph, &ExportConfig::default()).unwrap();
        assert_eq!(from_json(&json).unwrap(), graph);
    }

    #[test]
    fn lenient_legacy_fields() {
        let text = r#"{
            "topNode": 2, "topEdge": 1,
            "nodes": { "0": {"x": 1, "y": 2}, "1": {"x": 3, "y": 4} },
            "edges": { "0": {"u": "0", "v": "1"} }
        }"#;
        let graph = from_json(text).unwrap();
        assert!(!graph.is_weighted);
        assert!(!graph.is_directed);
        let edge = graph.edge(EdgeId(0)).unwrap();
        assert_eq!((edge.u, edge.v, edge.w), (NodeId(0), NodeId(1), 1.0));
    }

    #[test]
    fn malformed_documents_rejected() {
        let cases = [
            "not json",
            r#"{"topNode": 0}"#,
            r#"{"topNode": -1, "topEdge": 0, "nodes": {}, "edges": {}}"#,
            r#"{"topNode": 1, "topEdge": 0, "nodes": {"a": {"x": 0, "y": 0}}, "edges": {}}"#,
            r#"{"topNode": 2, "topEdge": 0, "nodes": {"01": {"x": 0, "y": 0}}, "edges": {}}"#,
            r#"{"topNode": 1, "topEdge": 0, "nodes": {"0": {"x": "left", "y": 0}}, "edges": {}}"#,
            r#"{"topNode": 2, "topEdge": 1, "nodes": {}, "edges": {"0": {"u": "x", "v": 1}}}"#,
        ];
        for text in cases {
            assert!(
                matches!(from_json(text), Err(GraphError::MalformedDocument(_))),
                "expected rejection of {text}"
            );
        }
    }

    #[test]
    fn import_json_keeps_prior_graph_on_dangling_edge() {
        let mut store = GraphStore::from_graph(triangle()).unwrap();
        let before = store.graph().clone();
        let text = r#"{
            "topNode": 1, "topEdge": 1, "isWeighted": false, "isDirected": false,
            "nodes": { "0": {"x": 0, "y": 0} },
            "edges": { "0": {"u": 0, "v": 4, "w": 1} }
        }"#;
        assert_eq!(
            store.import_json(text),
            Err(GraphError::DanglingEdge {
                edge: EdgeId(0),
                node: NodeId(4)
            })
        );
        assert_eq!(store.graph(), &before);
    }
}
