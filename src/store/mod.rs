//! Graph persistence backends.
//!
//! A backend only has to turn bytes into a graph and back; reading and
//! writing files is provided on top of that.

pub mod json;
pub mod shared;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::graph::{AnalyticsGraph, GraphError};

pub use json::{JsonGraphPersistence, JSON_FORMAT_VERSION};
pub use shared::{CacheConfig, CacheStats, SharedPersistence};

/// Errors from loading or saving graphs.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid for this format.
    #[error("Invalid graph document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document was written by another format version.
    #[error("Unsupported graph document version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version in the document.
        found: u32,
        /// Version this backend reads.
        expected: u32,
    },

    /// The document describes an inconsistent graph.
    #[error("Invalid graph: {0}")]
    Graph(#[from] GraphError),
}

/// A file format for analytics graphs.
pub trait GraphPersistence: Send + Sync {
    /// File extension, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Format version written by [`encode`](Self::encode).
    fn version(&self) -> u32;

    /// Parse a graph from raw document bytes.
    fn decode(&self, bytes: &[u8]) -> Result<AnalyticsGraph, PersistenceError>;

    /// Serialize a graph into document bytes.
    fn encode(&self, graph: &AnalyticsGraph) -> Result<Vec<u8>, PersistenceError>;

    /// Read and parse the graph stored at `path`.
    fn load(&self, path: &Path) -> Result<AnalyticsGraph, PersistenceError> {
        self.decode(&read_file(path)?)
    }

    /// Serialize `graph` to `path`, replacing any existing file.
    fn save(&self, graph: &AnalyticsGraph, path: &Path) -> Result<(), PersistenceError> {
        let bytes = self.encode(graph)?;
        fs::write(path, bytes).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, PersistenceError> {
    fs::read(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
