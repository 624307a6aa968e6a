//! Connection validation.

use thiserror::Error;

use super::edge::{Connection, Edge, EdgeId};
use crate::node::NodeId;
use crate::port::PortDirection;

/// Reason a candidate connection was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionRejection {
    /// Source and target are the same node.
    #[error("node {node} cannot connect to itself")]
    SelfLoop {
        /// The node on both ends.
        node: NodeId,
    },
    /// An edge with the same four endpoints already exists.
    #[error("an identical connection already exists as {existing}")]
    Duplicate {
        /// The edge with the same endpoints.
        existing: EdgeId,
    },
    /// An endpoint names a node that is not in the graph.
    #[error("node {node} does not exist")]
    UnknownNode {
        /// Missing node.
        node: NodeId,
    },
    /// An endpoint names a port the node does not currently have.
    #[error("node {node} has no {direction} port `{port}`")]
    UnknownPort {
        /// Node that was addressed.
        node: NodeId,
        /// Requested port id.
        port: String,
        /// Side the port was looked up on.
        direction: PortDirection,
    },
}

/// Checks the structural connection rules against the existing edges.
///
/// A candidate is refused if it is a self-loop or if an edge with the same
/// source, source port, target and target port already exists. Port
/// compatibility and fan-in are not restricted.
pub fn check<'a, I>(candidate: &Connection, existing: I) -> Result<(), ConnectionRejection>
where
    I: IntoIterator<Item = &'a Edge>,
{
    if candidate.is_self_loop() {
        return Err(ConnectionRejection::SelfLoop {
            node: candidate.source.clone(),
        });
    }

    if let Some(edge) = existing
        .into_iter()
        .find(|edge| candidate.same_endpoints(edge))
    {
        return Err(ConnectionRejection::Duplicate {
            existing: edge.id.clone(),
        });
    }

    Ok(())
}

/// Returns whether [`check`] accepts the candidate.
#[inline]
pub fn is_valid<'a, I>(candidate: &Connection, existing: I) -> bool
where
    I: IntoIterator<Item = &'a Edge>,
{
    check(candidate, existing).is_ok()
}
