//! Subcommand implementations.
//!
//! Every command prints its result on stdout; logs go to stderr.

mod analyze;
mod inspect;
mod serve;
mod storage;
mod submit;

use std::fs;

use anyhow::Context;
use pipecraft_graph::document::{DocumentStore, PipelineDocument};
use pipecraft_graph::graph::GraphStore;

use crate::TRACING_TARGET_COMMAND;
use crate::config::{Command, DocumentArgs};

/// Runs the selected command to completion.
pub async fn execute(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Serve(args) => serve::run(args).await,
        Command::Analyze(args) => analyze::run(&args),
        Command::Inspect(args) => inspect::run(&args),
        Command::Submit(args) => submit::run(args).await,
        Command::Import(args) => storage::import(&args),
        Command::Export(args) => storage::export(&args),
        Command::Clear(args) => storage::clear(&args),
    }
}

/// Reads the raw JSON of the document named by `args`.
///
/// Returns `None` when no path is given and nothing is saved.
fn read_source(args: &DocumentArgs) -> anyhow::Result<Option<String>> {
    let path = match &args.path {
        Some(path) => path.clone(),
        None => {
            let path = args.storage.store().path();
            if !path.exists() {
                tracing::info!(
                    target: TRACING_TARGET_COMMAND,
                    path = %path.display(),
                    "no saved pipeline"
                );
                return Ok(None);
            }
            path
        }
    };

    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Some(text))
}

/// Loads and fully validates the document named by `args`.
///
/// A missing saved pipeline is an empty graph.
fn load_graph(args: &DocumentArgs) -> anyhow::Result<GraphStore> {
    let document = match &args.path {
        Some(path) => pipecraft_graph::document::transfer::import(path)?,
        None => {
            let store = args.storage.store();
            store
                .load()
                .with_context(|| format!("failed to load {}", store.path().display()))?
                .unwrap_or_default()
        }
    };

    let mut graph = GraphStore::new();
    graph.replace_all(document)?;
    Ok(graph)
}

/// Returns the normalized document of a validated graph.
fn validated_document(args: &DocumentArgs) -> anyhow::Result<PipelineDocument> {
    Ok(load_graph(args)?.to_document())
}


#[cfg(test)]
mod tests {
    use std::fs;

    use pipecraft_graph::document::DocumentStore;

    use super::test::{chain, file, saved};
    use super::*;

    #[test]
    fn missing_saved_pipeline_is_empty() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        assert!(read_source(&saved(dir.path()))?.is_none());
        assert!(load_graph(&saved(dir.path()))?.graph().is_empty());
        Ok(())
    }

    #[test]
    fn loads_saved_pipeline() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let (store, _) = chain()?;
        saved(dir.path()).storage.store().save(&store.to_document())?;

        let graph = load_graph(&saved(dir.path()))?;
        assert_eq!(graph.graph().node_count(), 3);
        assert_eq!(graph.graph().edge_count(), 2);
        Ok(())
    }

    #[test]
    fn invalid_document_file_is_refused() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.json");
        fs::write(
            &path,
            r#"{"nodes": [{"id": "node_1", "type": "teleporter", "position": {"x": 0, "y": 0}}], "edges": []}"#,
        )?;

        assert!(load_graph(&file(&path)).is_err());
        Ok(())
    }
}
