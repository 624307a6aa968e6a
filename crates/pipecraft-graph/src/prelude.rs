//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use pipecraft_graph::prelude::*;
//! ```

pub use crate::analysis::{
    AnalysisReport, AnalysisRequest, LocalAnalyzer, PipelineAnalyzer, analyze,
};
pub use crate::document::{
    Autosave, DocumentError, DocumentStore, FileDocumentStore, MemoryDocumentStore,
    PipelineDocument,
};
pub use crate::graph::{
    CommandOutcome, CommitHook, Connection, ConnectionRejection, Edge, EdgeId, GraphCommand,
    GraphStore, PipelineGraph,
};
pub use crate::node::{Node, NodeConfig, NodeId, NodeKind, Position, Size};
pub use crate::port::{BuiltinCatalog, NodeCatalog, Port, PortDirection, PortResolver};
pub use crate::{Error, ErrorKind, Result};
