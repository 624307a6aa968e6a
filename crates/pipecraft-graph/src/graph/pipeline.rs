//! The pipeline graph data structure.

use std::collections::HashMap;

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::edge::{Edge, EdgeId};
use crate::document::DocumentError;
use crate::node::{Node, NodeId};
use crate::port::{PortDirection, PortResolver, ResolvedPorts};

/// Nodes and edges of a pipeline, in insertion order.
///
/// Every edge connects two distinct nodes of the graph. Whether the ports
/// it names still exist is maintained by [`GraphStore`](super::GraphStore).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineGraph {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
}

impl PipelineGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from raw parts, enforcing every graph invariant.
    ///
    /// Fails on duplicate node ids, duplicate edges, self-loops, edges to
    /// missing nodes, and edges naming ports their nodes do not have.
    pub fn from_parts(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        resolver: &PortResolver,
    ) -> Result<Self, DocumentError> {
        let mut graph = Self::new();

        for node in nodes {
            graph.insert_node(node)?;
        }

        let ports: HashMap<&NodeId, ResolvedPorts> = graph
            .nodes
            .values()
            .map(|node| (&node.id, resolver.resolve(node)))
            .collect();

        let mut accepted: IndexMap<EdgeId, Edge> = IndexMap::with_capacity(edges.len());
        for (index, edge) in edges.into_iter().enumerate() {
            if edge.source == edge.target {
                return Err(DocumentError::SelfLoop {
                    index,
                    node: edge.source,
                });
            }

            for (node, port, direction) in [
                (&edge.source, &edge.source_port, PortDirection::Output),
                (&edge.target, &edge.target_port, PortDirection::Input),
            ] {
                let Some(resolved) = ports.get(node) else {
                    return Err(DocumentError::DanglingEdge {
                        index,
                        node: node.clone(),
                    });
                };
                if !resolved.contains(direction, port) {
                    return Err(DocumentError::UnknownPort {
                        index,
                        node: node.clone(),
                        port: port.clone(),
                        direction,
                    });
                }
            }

            let duplicate = accepted.get(&edge.id).map(|existing| existing.id.clone()).or_else(|| {
                accepted
                    .values()
                    .find(|existing| edge.connection().same_endpoints(existing))
                    .map(|existing| existing.id.clone())
            });
            if let Some(existing) = duplicate {
                return Err(DocumentError::DuplicateEdge { index, existing });
            }

            accepted.insert(edge.id.clone(), edge);
        }

        graph.edges = accepted;
        Ok(graph)
    }

    /// Returns the number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has neither nodes nor edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Returns whether a node with `id` exists.
    #[inline]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Returns a node by id.
    #[inline]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns an edge by id.
    #[inline]
    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Iterates over nodes in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterates over node ids in insertion order.
    pub fn node_ids(&self) -> impl ExactSizeIterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Iterates over edges in insertion order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = &Edge> {
        self.edges.values()
    }

    /// Iterates over edges with `node` as source or target.
    pub fn edges_touching<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> {
        self.edges.values().filter(move |edge| edge.touches(node))
    }

    /// Iterates over edges leaving `node`.
    pub fn outgoing<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> {
        self.edges.values().filter(move |edge| &edge.source == node)
    }

    /// Iterates over edges entering `node`.
    pub fn incoming<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> {
        self.edges.values().filter(move |edge| &edge.target == node)
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Inserts `node` unless its id is already taken.
    pub(crate) fn insert_node(&mut self, node: Node) -> Result<(), DocumentError> {
        match self.nodes.entry(node.id.clone()) {
            Entry::Occupied(entry) => Err(DocumentError::DuplicateNode(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(node);
                Ok(())
            }
        }
    }

    pub(crate) fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        self.nodes.shift_remove(id)
    }

    pub(crate) fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge) {
        self.edges.insert(edge.id.clone(), edge);
    }

    pub(crate) fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        self.edges.shift_remove(id)
    }

    /// Removes and returns every edge matching `predicate`.
    pub(crate) fn remove_edges_where<F>(&mut self, mut predicate: F) -> Vec<Edge>
    where
        F: FnMut(&Edge) -> bool,
    {
        let ids: Vec<EdgeId> = self
            .edges
            .values()
            .filter(|edge| predicate(*edge))
            .map(|edge| edge.id.clone())
            .collect();

        ids.iter().filter_map(|id| self.edges.shift_remove(id)).collect()
    }
}
