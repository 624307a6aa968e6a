//! Graph mutation commands.

use super::edge::{Connection, Edge, EdgeId};
use crate::document::PipelineDocument;
use crate::node::{Node, NodeConfig, NodeId, NodeKind, Position, Size};

/// A single atomic change to a [`GraphStore`](super::GraphStore).
#[derive(Debug, Clone, PartialEq)]
pub enum GraphCommand {
    /// Create a node of `kind` at `position` with a fresh id.
    AddNode {
        /// Kind of the new node.
        kind: NodeKind,
        /// Drop position.
        position: Position,
    },
    /// Remove nodes and every edge touching them.
    RemoveNodes(Vec<NodeId>),
    /// Add a validated edge.
    Connect(Connection),
    /// Remove edges by id.
    RemoveEdges(Vec<EdgeId>),
    /// Remove every edge touching the given nodes, keeping the nodes.
    RemoveEdgesTouching(Vec<NodeId>),
    /// Shallow-merge `patch` into a node's configuration.
    UpdateNodeConfig {
        /// Node to update.
        id: NodeId,
        /// Keys to overwrite.
        patch: NodeConfig,
    },
    /// Set a node's explicit dimensions.
    ResizeNode {
        /// Node to resize.
        id: NodeId,
        /// New dimensions.
        size: Size,
    },
    /// Move a node on the canvas.
    MoveNode {
        /// Node to move.
        id: NodeId,
        /// New position.
        position: Position,
    },
    /// Replace the whole graph with a validated document.
    ReplaceAll(PipelineDocument),
    /// Remove everything.
    Clear,
}

/// Nodes and edges removed by a single command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Removal {
    /// Removed nodes.
    pub nodes: Vec<Node>,
    /// Removed edges, including those cascaded from node removal.
    pub edges: Vec<Edge>,
}

impl Removal {
    /// Returns whether nothing was removed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// What a committed [`GraphCommand`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A node was created.
    NodeAdded(NodeId),
    /// An edge was created.
    EdgeAdded(EdgeId),
    /// Nodes and/or edges were removed.
    Removed(Removal),
    /// A node changed; edges on ports it no longer has were pruned.
    NodeUpdated {
        /// Updated node.
        id: NodeId,
        /// Edges removed because their port disappeared.
        pruned: Vec<Edge>,
    },
    /// The graph was replaced or cleared.
    Replaced,
}
