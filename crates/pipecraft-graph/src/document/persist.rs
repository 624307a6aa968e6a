//! Session persistence of the current pipeline.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tempfile::NamedTempFile;

use super::PipelineDocument;
use crate::graph::{CommitHook, PipelineGraph};
use crate::{Error, Result};

/// Tracing target for persistence.
pub const TRACING_TARGET: &str = "pipecraft_graph::persist";

/// File name of the saved pipeline inside a data directory.
pub const STORAGE_FILE_NAME: &str = "pipecraft-pipeline.json";

/// A single-slot store for the current pipeline document.
pub trait DocumentStore: Send + Sync {
    /// Returns the saved document, or `None` if nothing was saved.
    fn load(&self) -> Result<Option<PipelineDocument>>;

    /// Replaces the saved document.
    fn save(&self, document: &PipelineDocument) -> Result<()>;

    /// Removes the saved document. Clearing an empty store succeeds.
    fn clear(&self) -> Result<()>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    fn load(&self) -> Result<Option<PipelineDocument>> {
        (**self).load()
    }

    fn save(&self, document: &PipelineDocument) -> Result<()> {
        (**self).save(document)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// In-memory store holding the serialized document.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    slot: Mutex<Option<String>>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw saved text.
    pub fn raw(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn load(&self) -> Result<Option<PipelineDocument>> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_deref()
            .map(PipelineDocument::from_json_str)
            .transpose()
            .map_err(Error::from)
    }

    fn save(&self, document: &PipelineDocument) -> Result<()> {
        let text = serde_json::to_string(document)
            .map_err(|source| Error::persistence("memory", io::Error::other(source)))?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(text);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Store backed by a fixed file inside a data directory.
///
/// Writes go to a temporary file that is then renamed over the target, so
/// a crash never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    dir: PathBuf,
}

impl FileDocumentStore {
    /// Creates a store saving to `dir/pipecraft-pipeline.json`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the document path.
    pub fn path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE_NAME)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(bytes)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|error| error.error)?;
        Ok(())
    }
}

impl DocumentStore for FileDocumentStore {
    fn load(&self) -> Result<Option<PipelineDocument>> {
        let path = self.path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(Error::persistence(path, error)),
        };

        Ok(Some(PipelineDocument::from_json_str(&text)?))
    }

    fn save(&self, document: &PipelineDocument) -> Result<()> {
        let path = self.path();
        let bytes = serde_json::to_vec(document)
            .map_err(|source| Error::persistence(&path, io::Error::other(source)))?;

        self.write_atomic(&path, &bytes)
            .map_err(|source| Error::persistence(&path, source))?;

        tracing::trace!(target: TRACING_TARGET, path = %path.display(), "pipeline saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(Error::persistence(path, error)),
        }
    }
}

/// Commit hook that keeps a [`DocumentStore`] in sync with the graph.
///
/// A non-empty graph is saved after every commit. An empty graph clears
/// the store. Failures are logged and never block the mutation.
pub struct Autosave<S> {
    store: S,
}

impl<S: DocumentStore> Autosave<S> {
    /// Creates an autosave hook over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: DocumentStore> CommitHook for Autosave<S> {
    fn on_commit(&mut self, graph: &PipelineGraph) {
        let result = if graph.is_empty() {
            self.store.clear()
        } else {
            self.store.save(&PipelineDocument::from_graph(graph))
        };

        if let Err(error) = result {
            tracing::warn!(target: TRACING_TARGET, error = %error, "autosave failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;
    use crate::node::{NodeKind, Position};

    #[test]
    fn memory_store_starts_empty() -> Result<()> {
        assert!(MemoryDocumentStore::new().load()?.is_none());
        Ok(())
    }

    #[test]
    fn autosave_saves_and_clears() -> Result<()> {
        let backing = Arc::new(MemoryDocumentStore::new());
        let mut store = GraphStore::new();
        store.add_hook(Autosave::new(backing.clone()));

        let id = store.add_node(NodeKind::Input, Position::default());
        let saved = backing.load()?;
        assert_eq!(saved.map(|document| document.nodes.len()), Some(1));

        store.remove_nodes(&[id]);
        assert!(backing.raw().is_none());
        Ok(())
    }

    #[test]
    fn restore_reads_saved_document() -> Result<()> {
        let backing = Arc::new(MemoryDocumentStore::new());
        {
            let mut store = GraphStore::new();
            store.add_hook(Autosave::new(backing.clone()));
            store.add_node(NodeKind::Llm, Position::new(5.0, 5.0));
        }

        let restored = GraphStore::restore(&*backing);
        assert_eq!(restored.graph().node_count(), 1);
        Ok(())
    }

    #[test]
    fn file_store_round_trips() -> Result<()> {
        let dir = tempfile::tempdir().map_err(|source| Error::persistence("tempdir", source))?;
        let files = FileDocumentStore::new(dir.path().join("nested"));
        assert!(files.load()?.is_none());

        let mut store = GraphStore::new();
        store.add_node(NodeKind::Output, Position::default());
        files.save(&store.to_document())?;

        let loaded = files.load()?;
        assert_eq!(loaded, Some(store.to_document()));

        files.clear()?;
        files.clear()?;
        assert!(files.load()?.is_none());
        Ok(())
    }

    #[test]
    fn corrupt_file_fails_to_load_and_restores_empty() -> Result<()> {
        let dir = tempfile::tempdir().map_err(|source| Error::persistence("tempdir", source))?;
        let files = FileDocumentStore::new(dir.path());
        fs::write(files.path(), "{ not json").map_err(|source| Error::persistence("write", source))?;

        assert!(files.load().is_err());
        assert!(GraphStore::restore(&files).graph().is_empty());
        Ok(())
    }
}
