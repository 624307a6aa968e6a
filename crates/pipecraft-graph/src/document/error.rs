//! Document validation errors.

use thiserror::Error;

use crate::graph::EdgeId;
use crate::node::NodeId;
use crate::port::PortDirection;

/// Reason a document could not be turned into a graph.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The input is not valid JSON.
    #[error("document is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The top-level value is not a JSON object.
    #[error("document must be a JSON object")]
    NotAnObject,

    /// A required top-level list is absent or null.
    #[error("document is missing the `{0}` list")]
    MissingList(&'static str),

    /// A top-level list field is not an array.
    #[error("document field `{0}` must be a list")]
    NotAList(&'static str),

    /// A node entry has the wrong shape or an unknown kind.
    #[error("node #{index} is invalid: {source}")]
    InvalidNode {
        /// Position in the node list.
        index: usize,
        /// Underlying decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// An edge entry has the wrong shape.
    #[error("edge #{index} is invalid: {source}")]
    InvalidEdge {
        /// Position in the edge list.
        index: usize,
        /// Underlying decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// Two nodes share an id.
    #[error("node id {0} appears more than once")]
    DuplicateNode(NodeId),

    /// Two edges share an id or connect the same four endpoints.
    #[error("edge #{index} duplicates {existing}")]
    DuplicateEdge {
        /// Position in the edge list.
        index: usize,
        /// The edge it collides with.
        existing: EdgeId,
    },

    /// An edge starts and ends on the same node.
    #[error("edge #{index} connects node {node} to itself")]
    SelfLoop {
        /// Position in the edge list.
        index: usize,
        /// The node on both ends.
        node: NodeId,
    },

    /// An edge references a node id that is not in the node list.
    #[error("edge #{index} references missing node {node}")]
    DanglingEdge {
        /// Position in the edge list.
        index: usize,
        /// Missing node.
        node: NodeId,
    },

    /// An edge references a port the node does not have.
    #[error("edge #{index} references unknown {direction} port `{port}` on node {node}")]
    UnknownPort {
        /// Position in the edge list.
        index: usize,
        /// Node that was addressed.
        node: NodeId,
        /// Requested port id.
        port: String,
        /// Side the port was looked up on.
        direction: PortDirection,
    },

    /// An edge omits a port and the node has no single port to fall back on.
    #[error("edge #{index} omits its {direction} port and node {node} has no single default")]
    UnresolvedPort {
        /// Position in the edge list.
        index: usize,
        /// Node that was addressed.
        node: NodeId,
        /// Side that could not be resolved.
        direction: PortDirection,
    },
}
