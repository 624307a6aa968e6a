//! The single mutable owner of the pipeline graph.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use super::command::{CommandOutcome, GraphCommand, Removal};
use super::edge::{Connection, Edge, EdgeId};
use super::hook::CommitHook;
use super::pipeline::PipelineGraph;
use super::validate::{self, ConnectionRejection};
use crate::document::{DocumentStore, PipelineDocument, transfer};
use crate::node::{
    NODE_ID_PREFIX, Node, NodeConfig, NodeId, NodeKind, Position, Size, next_id,
};
use crate::port::{PortDirection, PortResolver, ResolvedPorts};
use crate::{Error, Result};

/// Tracing target for graph store mutations.
pub const TRACING_TARGET: &str = "pipecraft_graph::store";

/// Owns the graph and applies every mutation to it.
///
/// Each mutation either fully applies or leaves the graph untouched, and
/// registered [`CommitHook`]s run after every applied mutation. Node ids
/// are never reused within the lifetime of a store, even after deletion,
/// clearing or import.
pub struct GraphStore {
    graph: PipelineGraph,
    resolver: PortResolver,
    high_water: Option<u64>,
    exhausted: HashSet<NodeId>,
    hooks: Vec<Box<dyn CommitHook>>,
}

impl GraphStore {
    /// Creates an empty store over the built-in catalog.
    pub fn new() -> Self {
        Self::with_resolver(PortResolver::default())
    }

    /// Creates an empty store over a custom resolver.
    pub fn with_resolver(resolver: PortResolver) -> Self {
        Self {
            graph: PipelineGraph::new(),
            resolver,
            high_water: None,
            exhausted: HashSet::new(),
            hooks: Vec::new(),
        }
    }

    /// Creates a store populated from `store`.
    ///
    /// A missing or unreadable document yields an empty graph. Hooks are
    /// not invoked for the restored state.
    pub fn restore(store: &dyn DocumentStore) -> Self {
        Self::restore_with(PortResolver::default(), store)
    }

    /// Like [`restore`](Self::restore) with a custom resolver.
    pub fn restore_with(resolver: PortResolver, store: &dyn DocumentStore) -> Self {
        let mut this = Self::with_resolver(resolver);

        match store.load() {
            Ok(Some(document)) => match document.into_graph(&this.resolver) {
                Ok(graph) => {
                    tracing::info!(
                        target: TRACING_TARGET,
                        nodes = graph.node_count(),
                        edges = graph.edge_count(),
                        "restored saved pipeline"
                    );
                    this.graph = graph;
                }
                Err(error) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        error = %error,
                        "saved pipeline is invalid, starting empty"
                    );
                }
            },
            Ok(None) => {
                tracing::debug!(target: TRACING_TARGET, "no saved pipeline");
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "failed to load saved pipeline, starting empty"
                );
            }
        }

        this
    }

    /// Registers a hook invoked after every committed mutation.
    pub fn add_hook(&mut self, hook: impl CommitHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Returns the current graph.
    #[inline]
    pub fn graph(&self) -> &PipelineGraph {
        &self.graph
    }

    /// Returns the port resolver.
    #[inline]
    pub fn resolver(&self) -> &PortResolver {
        &self.resolver
    }

    /// Returns the current ports of a node.
    pub fn ports(&self, id: &NodeId) -> Option<ResolvedPorts> {
        self.graph.node(id).map(|node| self.resolver.resolve(node))
    }

    /// Serializes the current graph into a document.
    pub fn to_document(&self) -> PipelineDocument {
        PipelineDocument::from_graph(&self.graph)
    }

    /// Applies a command.
    pub fn apply(&mut self, command: GraphCommand) -> Result<CommandOutcome> {
        match command {
            GraphCommand::AddNode { kind, position } => {
                Ok(CommandOutcome::NodeAdded(self.add_node(kind, position)))
            }
            GraphCommand::RemoveNodes(ids) => Ok(CommandOutcome::Removed(self.remove_nodes(&ids))),
            GraphCommand::Connect(connection) => {
                self.add_edge(connection).map(CommandOutcome::EdgeAdded)
            }
            GraphCommand::RemoveEdges(ids) => Ok(CommandOutcome::Removed(Removal {
                nodes: Vec::new(),
                edges: self.remove_edges(&ids),
            })),
            GraphCommand::RemoveEdgesTouching(ids) => Ok(CommandOutcome::Removed(Removal {
                nodes: Vec::new(),
                edges: self.remove_edges_touching(&ids),
            })),
            GraphCommand::UpdateNodeConfig { id, patch } => {
                let pruned = self.update_node_config(&id, patch)?;
                Ok(CommandOutcome::NodeUpdated { id, pruned })
            }
            GraphCommand::ResizeNode { id, size } => {
                self.resize_node(&id, size)?;
                Ok(CommandOutcome::NodeUpdated {
                    id,
                    pruned: Vec::new(),
                })
            }
            GraphCommand::MoveNode { id, position } => {
                self.move_node(&id, position)?;
                Ok(CommandOutcome::NodeUpdated {
                    id,
                    pruned: Vec::new(),
                })
            }
            GraphCommand::ReplaceAll(document) => {
                self.replace_all(document)?;
                Ok(CommandOutcome::Replaced)
            }
            GraphCommand::Clear => {
                self.clear();
                Ok(CommandOutcome::Replaced)
            }
        }
    }

    /// Creates a node of `kind` with default configuration and a fresh id.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let config = self.resolver.catalog().default_config(kind);
        let id = loop {
            let id = self.allocate_id();
            let node = Node::new(id.clone(), kind, position).with_config(config.clone());
            match self.graph.insert_node(node) {
                Ok(()) => break id,
                Err(error) => {
                    tracing::warn!(target: TRACING_TARGET, error = %error, "allocated id is taken");
                    self.retire(std::iter::once(&id));
                }
            }
        };
        tracing::debug!(target: TRACING_TARGET, node_id = %id, kind = %kind, "node added");

        self.commit();
        id
    }

    /// Removes nodes and every edge touching them.
    ///
    /// Unknown ids are ignored. Hooks run only if something was removed.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> Removal {
        let edges = self
            .graph
            .remove_edges_where(|edge| ids.iter().any(|id| edge.touches(id)));
        let nodes: Vec<Node> = ids
            .iter()
            .filter_map(|id| self.graph.remove_node(id))
            .collect();

        let removal = Removal { nodes, edges };
        if !removal.is_empty() {
            self.retire(removal.nodes.iter().map(|node| &node.id));
            tracing::debug!(
                target: TRACING_TARGET,
                nodes = removal.nodes.len(),
                edges = removal.edges.len(),
                "nodes removed"
            );
            self.commit();
        }

        removal
    }

    /// Adds an edge for `connection` if the validator and ports allow it.
    pub fn add_edge(&mut self, connection: Connection) -> Result<EdgeId> {
        if let Err(rejection) = self.check_connection(&connection) {
            tracing::debug!(
                target: TRACING_TARGET,
                source_node = %connection.source,
                target_node = %connection.target,
                reason = %rejection,
                "connection rejected"
            );
            return Err(rejection.into());
        }

        let id = self.unique_edge_id(connection.edge_id());
        let edge = Edge {
            id: id.clone(),
            source: connection.source,
            source_port: connection.source_port,
            target: connection.target,
            target_port: connection.target_port,
        };

        self.graph.insert_edge(edge);
        tracing::debug!(target: TRACING_TARGET, edge_id = %id, "edge added");

        self.commit();
        Ok(id)
    }

    /// Returns whether `connection` would be accepted by [`add_edge`](Self::add_edge).
    pub fn check_connection(&self, connection: &Connection) -> Result<(), ConnectionRejection> {
        validate::check(connection, self.graph.edges())?;

        for (node_id, port, direction) in [
            (&connection.source, &connection.source_port, PortDirection::Output),
            (&connection.target, &connection.target_port, PortDirection::Input),
        ] {
            let ports = self
                .ports(node_id)
                .ok_or_else(|| ConnectionRejection::UnknownNode {
                    node: node_id.clone(),
                })?;
            if !ports.contains(direction, port) {
                return Err(ConnectionRejection::UnknownPort {
                    node: node_id.clone(),
                    port: port.clone(),
                    direction,
                });
            }
        }

        Ok(())
    }

    /// Removes edges by id. Unknown ids are ignored.
    pub fn remove_edges(&mut self, ids: &[EdgeId]) -> Vec<Edge> {
        let removed: Vec<Edge> = ids
            .iter()
            .filter_map(|id| self.graph.remove_edge(id))
            .collect();

        if !removed.is_empty() {
            tracing::debug!(target: TRACING_TARGET, edges = removed.len(), "edges removed");
            self.commit();
        }

        removed
    }

    /// Removes every edge with an endpoint in `ids`, keeping the nodes.
    ///
    /// Hooks run only if something was removed.
    pub fn remove_edges_touching(&mut self, ids: &[NodeId]) -> Vec<Edge> {
        let touching: Vec<EdgeId> = ids
            .iter()
            .flat_map(|id| self.graph.edges_touching(id))
            .map(|edge| edge.id.clone())
            .collect();

        let removed: Vec<Edge> = touching
            .iter()
            .filter_map(|id| self.graph.remove_edge(id))
            .collect();

        if !removed.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET,
                nodes = ids.len(),
                edges = removed.len(),
                "edges detached"
            );
            self.commit();
        }

        removed
    }

    /// Shallow-merges `patch` into a node's configuration.
    ///
    /// Edges attached to ports the node no longer has afterwards are
    /// removed in the same mutation and returned.
    pub fn update_node_config(&mut self, id: &NodeId, patch: NodeConfig) -> Result<Vec<Edge>> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| Error::NodeNotFound(id.clone()))?;
        node.config.merge(patch);
        let ports = self.resolver.resolve(node);

        let pruned = self.graph.remove_edges_where(|edge| {
            (edge.target == *id && !ports.contains(PortDirection::Input, &edge.target_port))
                || (edge.source == *id && !ports.contains(PortDirection::Output, &edge.source_port))
        });

        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %id,
            pruned = pruned.len(),
            "node configuration updated"
        );

        self.commit();
        Ok(pruned)
    }

    /// Sets a node's explicit dimensions.
    pub fn resize_node(&mut self, id: &NodeId, size: Size) -> Result<()> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| Error::NodeNotFound(id.clone()))?;
        node.size = Some(size);

        self.commit();
        Ok(())
    }

    /// Moves a node on the canvas.
    pub fn move_node(&mut self, id: &NodeId, position: Position) -> Result<()> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| Error::NodeNotFound(id.clone()))?;
        node.position = position;

        self.commit();
        Ok(())
    }

    /// Replaces the whole graph with `document` after validating it.
    ///
    /// On failure the current graph is left untouched.
    pub fn replace_all(&mut self, document: PipelineDocument) -> Result<()> {
        let graph = document.into_graph(&self.resolver)?;
        self.install(graph);
        Ok(())
    }

    /// Imports a document file, replacing the whole graph.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let document = transfer::import(path)?;
        self.replace_all(document)
    }

    /// Exports the current graph to a document file.
    pub fn export_file(&self, path: impl AsRef<Path>) -> Result<()> {
        transfer::export(&self.to_document(), path)
    }

    /// Removes every node and edge.
    pub fn clear(&mut self) {
        self.install(PipelineGraph::new());
    }

    fn install(&mut self, graph: PipelineGraph) {
        let previous = std::mem::replace(&mut self.graph, graph);
        self.retire(previous.node_ids());

        tracing::debug!(
            target: TRACING_TARGET,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "graph replaced"
        );

        self.commit();
    }

    fn allocate_id(&mut self) -> NodeId {
        let retired = self.high_water.map(NodeId::sequential);
        let id = next_id(
            self.graph
                .node_ids()
                .chain(retired.as_ref())
                .chain(&self.exhausted),
        );
        self.retire(std::iter::once(&id));
        id
    }

    /// Marks ids as used so later allocations skip them.
    fn retire<'a>(&mut self, ids: impl Iterator<Item = &'a NodeId>) {
        let exhausted = format!("{NODE_ID_PREFIX}{}_", u64::MAX);
        for id in ids {
            if let Some(sequence) = id.sequence() {
                self.high_water = self.high_water.max(Some(sequence));
            } else if id.as_str().starts_with(&exhausted) {
                self.exhausted.insert(id.clone());
            }
        }
    }

    fn unique_edge_id(&self, derived: EdgeId) -> EdgeId {
        if !self.graph.contains_edge(&derived) {
            return derived;
        }

        let mut suffix = 1_u32;
        loop {
            let candidate = EdgeId::new(format!("{derived}-{suffix}"));
            if !self.graph.contains_edge(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn commit(&mut self) {
        for hook in &mut self.hooks {
            hook.on_commit(&self.graph);
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("graph", &self.graph)
            .field("high_water", &self.high_water)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
