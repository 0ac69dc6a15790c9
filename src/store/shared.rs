//! Single coordination point for graph files.
//!
//! All loads and saves go through one lock, so callers that share a
//! [`SharedPersistence`] see each graph file one operation at a time. Loaded
//! graphs are cached by the xxh64 of the file contents: re-reading an
//! unchanged file skips parsing, and a changed file always misses.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::{read_file, GraphPersistence, PersistenceError};
use crate::canonical::content_hash;
use crate::graph::AnalyticsGraph;

const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(n) => n,
    None => unreachable!(),
};

/// Configuration for the loaded-graph cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of graphs kept.
    pub max_entries: usize,
    /// Whether to enable the cache.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 64,
            enabled: true,
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of entries in the cache.
    pub len: usize,
    /// Maximum capacity of the cache.
    pub cap: usize,
}

struct Inner<P> {
    backend: P,
    cache: Option<LruCache<u64, Arc<AnalyticsGraph>>>,
}

/// Shared, cached access to a persistence backend.
///
/// Cloning is cheap; clones share the lock and the cache.
pub struct SharedPersistence<P> {
    inner: Arc<Mutex<Inner<P>>>,
}

impl<P> Clone for SharedPersistence<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: GraphPersistence> SharedPersistence<P> {
    /// Wrap `backend` with the default cache.
    pub fn new(backend: P) -> Self {
        Self::with_config(backend, CacheConfig::default())
    }

    /// Wrap `backend` with a custom cache configuration.
    pub fn with_config(backend: P, config: CacheConfig) -> Self {
        let cache = config.enabled.then(|| {
            let size = NonZeroUsize::new(config.max_entries).unwrap_or(FALLBACK_CAPACITY);
            LruCache::new(size)
        });
        Self {
            inner: Arc::new(Mutex::new(Inner { backend, cache })),
        }
    }

    /// Load the graph at `path`, reusing a cached parse of identical contents.
    pub fn load(&self, path: &Path) -> Result<Arc<AnalyticsGraph>, PersistenceError> {
        let mut inner = self.inner.lock();
        let bytes = read_file(path)?;
        let key = content_hash(&bytes);

        if let Some(graph) = inner.cache.as_mut().and_then(|cache| cache.get(&key)) {
            debug!(path = %path.display(), key, "graph cache hit");
            return Ok(Arc::clone(graph));
        }

        let graph = Arc::new(inner.backend.decode(&bytes)?);
        if let Some(cache) = inner.cache.as_mut() {
            cache.put(key, Arc::clone(&graph));
        }
        debug!(
            path = %path.display(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph loaded"
        );
        Ok(graph)
    }

    /// Save `graph` to `path`.
    pub fn save(&self, graph: &AnalyticsGraph, path: &Path) -> Result<(), PersistenceError> {
        let inner = self.inner.lock();
        inner.backend.save(graph, path)?;
        debug!(path = %path.display(), vertices = graph.vertex_count(), "graph saved");
        Ok(())
    }

    /// File extension of the wrapped backend.
    pub fn file_extension(&self) -> &'static str {
        self.inner.lock().backend.file_extension()
    }

    /// Get cache statistics.
    ///
    /// Returns `None` if caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.inner.lock().cache.as_ref().map(|cache| CacheStats {
            len: cache.len(),
            cap: cache.cap().get(),
        })
    }

    /// Drop every cached graph.
    pub fn clear_cache(&self) {
        if let Some(cache) = self.inner.lock().cache.as_mut() {
            cache.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonGraphPersistence;
    use crate::types::{Attribute, VertexInfo};

    fn make_graph(degree: i32) -> AnalyticsGraph {
        let mut graph = AnalyticsGraph::new();
        graph.add_vertex(VertexInfo::new(":app").with_attribute("degree", Attribute::int(degree)));
        graph
    }

    #[test]
    fn test_unchanged_file_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.json");
        let shared = SharedPersistence::new(JsonGraphPersistence);

        shared.save(&make_graph(1), &path).unwrap();
        let first = shared.load(&path).unwrap();
        let second = shared.load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(shared.cache_stats(), Some(CacheStats { len: 1, cap: 64 }));
    }

    #[test]
    fn test_changed_file_misses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.json");
        let shared = SharedPersistence::new(JsonGraphPersistence);

        shared.save(&make_graph(1), &path).unwrap();
        let first = shared.load(&path).unwrap();
        shared.save(&make_graph(2), &path).unwrap();
        let second = shared.load(&path).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(shared.cache_stats().unwrap().len, 2);

        shared.clear_cache();
        assert_eq!(shared.cache_stats().unwrap().len, 0);
    }

    #[test]
    fn test_disabled_cache() {
        let config = CacheConfig { max_entries: 8, enabled: false };
        let shared = SharedPersistence::with_config(JsonGraphPersistence, config);
        assert!(shared.cache_stats().is_none());
        assert_eq!(shared.file_extension(), "json");
    }

    #[test]
    fn test_clones_share_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.json");
        let shared = SharedPersistence::new(JsonGraphPersistence);
        let clone = shared.clone();

        shared.save(&make_graph(3), &path).unwrap();
        clone.load(&path).unwrap();
        assert_eq!(shared.cache_stats().unwrap().len, 1);
    }
}
