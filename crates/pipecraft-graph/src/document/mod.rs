//! Portable JSON form of a pipeline graph.
//!
//! A [`PipelineDocument`] is the structural mirror of a graph:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "node_0", "type": "input", "position": { "x": 0, "y": 0 }, "data": {} }],
//!   "edges": [{ "id": "...", "source": "node_0", "sourceHandle": "output",
//!               "target": "node_1", "targetHandle": "input" }]
//! }
//! ```
//!
//! Unknown fields are ignored on read. Edges may omit their id (derived from
//! the endpoints) or a handle (resolved to the node's only port on that side).

mod error;
mod persist;
pub mod transfer;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use self::error::DocumentError;
pub use self::persist::{
    Autosave, DocumentStore, FileDocumentStore, MemoryDocumentStore, STORAGE_FILE_NAME,
};
use crate::graph::{Edge, EdgeId, PipelineGraph};
use crate::node::{Node, NodeId};
use crate::port::{PortDirection, PortResolver, ResolvedPorts};

/// An edge as it appears in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDocument {
    /// Edge id, derived from the endpoints when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EdgeId>,
    /// Source node.
    pub source: NodeId,
    /// Output port on the source node.
    #[serde(rename = "sourceHandle", default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Target node.
    pub target: NodeId,
    /// Input port on the target node.
    #[serde(rename = "targetHandle", default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl From<&Edge> for EdgeDocument {
    fn from(edge: &Edge) -> Self {
        Self {
            id: Some(edge.id.clone()),
            source: edge.source.clone(),
            source_handle: Some(edge.source_port.clone()),
            target: edge.target.clone(),
            target_handle: Some(edge.target_port.clone()),
        }
    }
}

/// Serialized pipeline: a node list and an edge list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDocument {
    /// Nodes in graph order.
    pub nodes: Vec<Node>,
    /// Edges in graph order.
    pub edges: Vec<EdgeDocument>,
}

impl PipelineDocument {
    /// Captures the current state of `graph`.
    pub fn from_graph(graph: &PipelineGraph) -> Self {
        Self {
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges().map(EdgeDocument::from).collect(),
        }
    }

    /// Parses a document from JSON text, checking its shape.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let value = serde_json::from_str(text).map_err(DocumentError::Syntax)?;
        Self::from_value(value)
    }

    /// Parses a document from a JSON value, checking its shape.
    ///
    /// Both `nodes` and `edges` must be present as lists. Each entry is
    /// decoded on its own so errors point at the offending index.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(mut root) = value else {
            return Err(DocumentError::NotAnObject);
        };

        let raw_nodes = take_list(&mut root, "nodes")?;
        let raw_edges = take_list(&mut root, "edges")?;

        let nodes = raw_nodes
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                serde_json::from_value(raw)
                    .map_err(|source| DocumentError::InvalidNode { index, source })
            })
            .collect::<Result<Vec<Node>, _>>()?;

        let edges = raw_edges
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                serde_json::from_value(raw)
                    .map_err(|source| DocumentError::InvalidEdge { index, source })
            })
            .collect::<Result<Vec<EdgeDocument>, _>>()?;

        Ok(Self { nodes, edges })
    }

    /// Renders the document as indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Returns whether the document has neither nodes nor edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Validates the document and builds a graph from it.
    ///
    /// Fails on unknown node kinds, duplicate ids, edges to missing nodes,
    /// and edges naming ports their nodes do not have.
    pub fn into_graph(self, resolver: &PortResolver) -> Result<PipelineGraph, DocumentError> {
        let ports: HashMap<&NodeId, ResolvedPorts> = self
            .nodes
            .iter()
            .map(|node| (&node.id, resolver.resolve(node)))
            .collect();

        let edges = self
            .edges
            .iter()
            .enumerate()
            .map(|(index, edge)| {
                let source_port = resolve_handle(
                    &ports,
                    index,
                    &edge.source,
                    edge.source_handle.as_deref(),
                    PortDirection::Output,
                )?;
                let target_port = resolve_handle(
                    &ports,
                    index,
                    &edge.target,
                    edge.target_handle.as_deref(),
                    PortDirection::Input,
                )?;
                let id = edge.id.clone().unwrap_or_else(|| {
                    EdgeId::derive(&edge.source, &source_port, &edge.target, &target_port)
                });

                Ok(Edge {
                    id,
                    source: edge.source.clone(),
                    source_port,
                    target: edge.target.clone(),
                    target_port,
                })
            })
            .collect::<Result<Vec<_>, DocumentError>>()?;

        drop(ports);
        PipelineGraph::from_parts(self.nodes, edges, resolver)
    }
}

fn take_list(root: &mut Map<String, Value>, field: &'static str) -> Result<Vec<Value>, DocumentError> {
    match root.remove(field) {
        None | Some(Value::Null) => Err(DocumentError::MissingList(field)),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(DocumentError::NotAList(field)),
    }
}

fn resolve_handle(
    ports: &HashMap<&NodeId, ResolvedPorts>,
    index: usize,
    node: &NodeId,
    handle: Option<&str>,
    direction: PortDirection,
) -> Result<String, DocumentError> {
    if let Some(handle) = handle {
        return Ok(handle.to_owned());
    }

    let resolved = ports.get(node).ok_or_else(|| DocumentError::DanglingEdge {
        index,
        node: node.clone(),
    })?;

    resolved
        .sole(direction)
        .map(|port| port.id.clone())
        .ok_or_else(|| DocumentError::UnresolvedPort {
            index,
            node: node.clone(),
            direction,
        })
}
