#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;

pub use client::{AnalyzerClient, PARSE_ENDPOINT};
pub use config::{AnalyzerConfig, DEFAULT_ANALYZER_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{Error, Result};

/// Tracing target for analysis submissions.
pub const TRACING_TARGET: &str = "pipecraft_client";
