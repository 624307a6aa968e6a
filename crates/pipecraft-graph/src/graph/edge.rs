//! Directed connections between node ports.

use derive_more::{Debug, Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Identifier of an edge.
///
/// Derived from the endpoints as
/// `reactflow__edge-<source><sourcePort>-<target><targetPort>`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Debug, Display, From, Into)]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Prefix of derived edge ids.
    pub const PREFIX: &'static str = "reactflow__edge-";

    /// Creates an edge id from any string.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the id for a connection.
    pub fn derive(source: &NodeId, source_port: &str, target: &NodeId, target_port: &str) -> Self {
        Self(format!(
            "{}{source}{source_port}-{target}{target_port}",
            Self::PREFIX
        ))
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for EdgeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A candidate connection that has not been added to a graph yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Source node.
    pub source: NodeId,
    /// Output port on the source node.
    pub source_port: String,
    /// Target node.
    pub target: NodeId,
    /// Input port on the target node.
    pub target_port: String,
}

impl Connection {
    /// Creates a candidate connection.
    pub fn new(
        source: impl Into<NodeId>,
        source_port: impl Into<String>,
        target: impl Into<NodeId>,
        target_port: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_port: source_port.into(),
            target: target.into(),
            target_port: target_port.into(),
        }
    }

    /// Returns whether source and target are the same node.
    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Returns whether `edge` connects exactly the same four endpoints.
    pub fn same_endpoints(&self, edge: &Edge) -> bool {
        self.source == edge.source
            && self.source_port == edge.source_port
            && self.target == edge.target
            && self.target_port == edge.target_port
    }

    /// Returns the id the edge would receive.
    pub fn edge_id(&self) -> EdgeId {
        EdgeId::derive(
            &self.source,
            &self.source_port,
            &self.target,
            &self.target_port,
        )
    }

    /// Turns the connection into an edge with a derived id.
    pub fn into_edge(self) -> Edge {
        Edge {
            id: self.edge_id(),
            source: self.source,
            source_port: self.source_port,
            target: self.target,
            target_port: self.target_port,
        }
    }
}

/// A directed connection from an output port to an input port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge identifier.
    pub id: EdgeId,
    /// Source node.
    pub source: NodeId,
    /// Output port on the source node.
    #[serde(rename = "sourceHandle")]
    pub source_port: String,
    /// Target node.
    pub target: NodeId,
    /// Input port on the target node.
    #[serde(rename = "targetHandle")]
    pub target_port: String,
}

impl Edge {
    /// Returns the four endpoints as a candidate connection.
    pub fn connection(&self) -> Connection {
        Connection {
            source: self.source.clone(),
            source_port: self.source_port.clone(),
            target: self.target.clone(),
            target_port: self.target_port.clone(),
        }
    }

    /// Returns whether either endpoint is `node`.
    #[inline]
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}
