//! `pipecraft import`, `export` and `clear`: manage the saved pipeline.

use anyhow::Context;
use pipecraft_graph::document::DocumentStore;
use pipecraft_graph::document::transfer::{self, default_export_file_name};
use pipecraft_graph::graph::GraphStore;

use crate::TRACING_TARGET_COMMAND;
use crate::config::{ExportArgs, ImportArgs, StorageConfig};

/// Validates `args.path` and replaces the saved pipeline with it.
///
/// An invalid file leaves the saved pipeline untouched.
pub fn import(args: &ImportArgs) -> anyhow::Result<()> {
    let mut graph = GraphStore::new();
    graph
        .import_file(&args.path)
        .with_context(|| format!("failed to import {}", args.path.display()))?;

    let store = args.storage.store();
    let document = graph.to_document();
    if document.is_empty() {
        store.clear()?;
    } else {
        store.save(&document)?;
    }

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        path = %store.path().display(),
        nodes = document.nodes.len(),
        edges = document.edges.len(),
        "saved pipeline replaced"
    );
    println!(
        "Imported {} nodes and {} edges into {}",
        document.nodes.len(),
        document.edges.len(),
        store.path().display()
    );
    Ok(())
}

/// Writes the saved pipeline to `--output` or a dated file.
pub fn export(args: &ExportArgs) -> anyhow::Result<()> {
    let store = args.storage.store();
    let document = store
        .load()
        .with_context(|| format!("failed to load {}", store.path().display()))?
        .with_context(|| format!("no saved pipeline at {}", store.path().display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_export_file_name().into());
    transfer::export(&document, &output)?;

    println!("Exported pipeline to {}", output.display());
    Ok(())
}

/// Deletes the saved pipeline; a missing one is not an error.
pub fn clear(args: &StorageConfig) -> anyhow::Result<()> {
    let store = args.store();
    store.clear()?;

    println!("Cleared {}", store.path().display());
    Ok(())
}
