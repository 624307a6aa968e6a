//! Structural analysis of pipelines.
//!
//! The analyzer counts nodes and edges and decides whether the node-level
//! structure is a directed acyclic graph. Ports are ignored.

mod cycle;

use std::convert::Infallible;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use self::cycle::Adjacency;
use crate::document::PipelineDocument;
use crate::graph::PipelineGraph;

/// Tracing target for analysis.
pub const TRACING_TARGET: &str = "pipecraft_graph::analysis";

/// Message shown for an acyclic pipeline.
pub const DAG_MESSAGE: &str = "Your pipeline is a valid Directed Acyclic Graph!";

/// Message shown for a pipeline with cycles.
pub const CYCLE_MESSAGE: &str = "Warning: Your pipeline contains cycles and is not a valid DAG.";

/// Result of analyzing a pipeline.
///
/// Serializes with the field names `num_nodes`, `num_edge` and `is_dag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Number of nodes submitted.
    #[serde(rename = "num_nodes")]
    pub node_count: usize,
    /// Number of edges submitted, including ones that were ignored.
    #[serde(rename = "num_edge")]
    pub edge_count: usize,
    /// Whether the node-level structure has no directed cycle.
    pub is_dag: bool,
}

impl AnalysisReport {
    /// Returns the one-line verdict for the DAG check.
    pub fn verdict(&self) -> &'static str {
        if self.is_dag { DAG_MESSAGE } else { CYCLE_MESSAGE }
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Analysis Results:")?;
        writeln!(f, "Number of Nodes: {}", self.node_count)?;
        writeln!(f, "Number of Edges: {}", self.edge_count)?;
        write!(f, "{}", self.verdict())
    }
}

/// A node as submitted for analysis. Only the id matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    /// Node id.
    pub id: String,
}

/// An edge as submitted for analysis. Only the endpoints matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRef {
    /// Source node id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Target node id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Lenient analysis input: any node and edge lists.
///
/// Extra fields are ignored. Edges with a missing endpoint, or one that is
/// not a listed node id, are counted but play no part in the DAG check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Submitted nodes.
    pub nodes: Vec<NodeRef>,
    /// Submitted edges.
    pub edges: Vec<EdgeRef>,
}

impl AnalysisRequest {
    /// Returns whether nothing was submitted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Analyzes the request.
    pub fn analyze(&self) -> AnalysisReport {
        let adjacency = Adjacency::new(
            self.nodes.iter().map(|node| node.id.as_str()),
            self.edges.iter().filter_map(|edge| {
                Some((edge.source.as_deref()?, edge.target.as_deref()?))
            }),
        );

        let report = AnalysisReport {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            is_dag: adjacency.is_acyclic(),
        };

        tracing::debug!(
            target: TRACING_TARGET,
            nodes = report.node_count,
            edges = report.edge_count,
            is_dag = report.is_dag,
            "pipeline analyzed"
        );
        report
    }
}

impl From<&PipelineDocument> for AnalysisRequest {
    fn from(document: &PipelineDocument) -> Self {
        Self {
            nodes: document
                .nodes
                .iter()
                .map(|node| NodeRef {
                    id: node.id.to_string(),
                })
                .collect(),
            edges: document
                .edges
                .iter()
                .map(|edge| EdgeRef {
                    source: Some(edge.source.to_string()),
                    target: Some(edge.target.to_string()),
                })
                .collect(),
        }
    }
}

/// Analyzes a graph.
pub fn analyze(graph: &PipelineGraph) -> AnalysisReport {
    let adjacency = Adjacency::new(
        graph.node_ids().map(|id| id.as_str()),
        graph
            .edges()
            .map(|edge| (edge.source.as_str(), edge.target.as_str())),
    );

    AnalysisReport {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        is_dag: adjacency.is_acyclic(),
    }
}

/// Something that can analyze a snapshot of a pipeline document.
///
/// The document is taken by value: later edits to the graph never affect
/// an analysis that is already in flight.
#[async_trait]
pub trait PipelineAnalyzer: Send + Sync {
    /// Error produced when the analysis cannot be performed.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Analyzes `document`.
    async fn analyze(&self, document: PipelineDocument) -> Result<AnalysisReport, Self::Error>;
}

/// Analyzer that runs in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAnalyzer;

#[async_trait]
impl PipelineAnalyzer for LocalAnalyzer {
    type Error = Infallible;

    async fn analyze(&self, document: PipelineDocument) -> Result<AnalysisReport, Self::Error> {
        Ok(AnalysisRequest::from(&document).analyze())
    }
}
