#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod document;
mod error;
pub mod graph;
pub mod node;
pub mod port;

#[doc(hidden)]
pub mod prelude;

pub use error::{Error, ErrorKind, Result};

/// Tracing target for graph operations.
pub const TRACING_TARGET: &str = "pipecraft_graph";
