//! Export and import of pipeline documents as files.

use std::fs;
use std::io;
use std::path::Path;

use jiff::civil::Date;
use jiff::{Timestamp, tz::TimeZone};

use super::PipelineDocument;
use crate::{Error, Result};

/// Tracing target for file transfer.
pub const TRACING_TARGET: &str = "pipecraft_graph::transfer";

/// Returns `pipeline-<YYYY-MM-DD>.json` for `date`.
pub fn export_file_name(date: Date) -> String {
    format!("pipeline-{date}.json")
}

/// Returns the export file name for the current UTC date.
pub fn default_export_file_name() -> String {
    export_file_name(Timestamp::now().to_zoned(TimeZone::UTC).date())
}

/// Writes `document` as indented JSON to `path`.
pub fn export(document: &PipelineDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = document
        .to_json_pretty()
        .map_err(|source| Error::persistence(path, io::Error::other(source)))?;

    fs::write(path, text).map_err(|source| Error::persistence(path, source))?;

    tracing::info!(
        target: TRACING_TARGET,
        path = %path.display(),
        nodes = document.nodes.len(),
        edges = document.edges.len(),
        "pipeline exported"
    );
    Ok(())
}

/// Reads and shape-checks a document from `path`.
///
/// Graph-level validation happens when the document is applied to a
/// store, so a rejected import never touches the current graph.
pub fn import(path: impl AsRef<Path>) -> Result<PipelineDocument> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::persistence(path, source))?;
    let document = PipelineDocument::from_json_str(&text)?;

    tracing::info!(
        target: TRACING_TARGET,
        path = %path.display(),
        nodes = document.nodes.len(),
        edges = document.edges.len(),
        "pipeline imported"
    );
    Ok(document)
}
