//! Location of the saved pipeline.

use std::path::PathBuf;

use clap::Args;
use pipecraft_graph::document::FileDocumentStore;
use serde::{Deserialize, Serialize};

/// Where the saved pipeline document lives.
///
/// The document is kept as `pipecraft-pipeline.json` inside the data directory.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the saved pipeline
    #[arg(long = "data-dir", env = "PIPECRAFT_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Returns the file-backed store for the saved pipeline.
    pub fn store(&self) -> FileDocumentStore {
        FileDocumentStore::new(&self.data_dir)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
        }
    }
}
