//! Error types for graph operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentError;
use crate::graph::ConnectionRejection;
use crate::node::NodeId;

/// Result type for graph operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A connection was refused by the validator.
    Rejected,
    /// An operation addressed a node that does not exist.
    NotFound,
    /// A document failed validation.
    MalformedDocument,
    /// Reading or writing persistent storage failed.
    Persistence,
}

/// Errors that can occur during graph operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A connection was refused.
    #[error("connection rejected: {0}")]
    Rejected(#[from] ConnectionRejection),

    /// A node id did not resolve.
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),

    /// A document failed validation.
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] DocumentError),

    /// A storage read or write failed.
    #[error("persistence failed for {}: {source}", path.display())]
    Persistence {
        /// File or location involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Creates a persistence error for `path`.
    pub fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Returns the error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected(_) => ErrorKind::Rejected,
            Self::NodeNotFound(_) => ErrorKind::NotFound,
            Self::MalformedDocument(_) => ErrorKind::MalformedDocument,
            Self::Persistence { .. } => ErrorKind::Persistence,
        }
    }
}
