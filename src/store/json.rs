//! Versioned JSON graph documents.
//!
//! ```json
//! {
//!   "version": 1,
//!   "vertices": [{ "path": ":app", "attributes": { "degree": { "type": "int", "value": "2" } } }],
//!   "edges": [{ "source": ":app", "target": ":lib", "attributes": {} }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GraphPersistence, PersistenceError};
use crate::graph::AnalyticsGraph;
use crate::types::{EdgeInfo, VertexInfo};

/// Document version written and accepted by [`JsonGraphPersistence`].
pub const JSON_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u32,
    vertices: Vec<&'a VertexInfo>,
    edges: Vec<&'a EdgeInfo>,
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    vertices: Vec<VertexInfo>,
    #[serde(default)]
    edges: Vec<EdgeInfo>,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Pretty-printed JSON with an explicit format version.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGraphPersistence;

impl JsonGraphPersistence {
    /// Create the JSON backend.
    pub fn new() -> Self {
        Self
    }
}

impl GraphPersistence for JsonGraphPersistence {
    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn version(&self) -> u32 {
        JSON_FORMAT_VERSION
    }

    fn decode(&self, bytes: &[u8]) -> Result<AnalyticsGraph, PersistenceError> {
        let probe: VersionProbe = serde_json::from_slice(bytes)?;
        if probe.version != JSON_FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: probe.version,
                expected: JSON_FORMAT_VERSION,
            });
        }

        let document: Document = serde_json::from_slice(bytes)?;
        let mut graph = AnalyticsGraph::new();
        for vertex in document.vertices {
            if let Some(existing) = graph.vertex_attributes_mut(vertex.path()) {
                debug!(vertex = %vertex.path(), "duplicate vertex in document, combining attributes");
                existing.extend(vertex.attributes);
            } else {
                graph.add_vertex(vertex);
            }
        }
        for edge in document.edges {
            if let Some(existing) = graph.edge_attributes_mut(edge.source(), edge.target()) {
                debug!(edge = %edge, "duplicate edge in document, combining attributes");
                existing.extend(edge.attributes);
            } else {
                graph.add_edge(edge)?;
            }
        }
        Ok(graph)
    }

    fn encode(&self, graph: &AnalyticsGraph) -> Result<Vec<u8>, PersistenceError> {
        let document = DocumentRef {
            version: JSON_FORMAT_VERSION,
            vertices: graph.vertices().collect(),
            edges: graph.edges().collect(),
        };
        Ok(serde_json::to_vec_pretty(&document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphError;
    use crate::types::{Attribute, VertexId};

    fn make_graph() -> AnalyticsGraph {
        let mut graph = AnalyticsGraph::new();
        graph.add_vertex(
            VertexInfo::new(":app")
                .with_attribute("degree", Attribute::int(1))
                .with_attribute("owner", Attribute::string("core-team")),
        );
        graph.add_vertex(VertexInfo::new(":lib").with_attribute("ratio", Attribute::double(0.25)));
        graph
            .add_edge(EdgeInfo::new(":app", ":lib").with_attribute("scope", Attribute::string("api")))
            .unwrap();
        graph
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let backend = JsonGraphPersistence::new();
        let graph = make_graph();

        backend.save(&graph, &path).unwrap();
        let loaded = backend.load(&path).unwrap();

        assert_eq!(loaded.fingerprint().unwrap(), graph.fingerprint().unwrap());
        let edge = loaded.edge(&VertexId::new(":app"), &VertexId::new(":lib")).unwrap();
        assert_eq!(edge.attributes["scope"], Attribute::string("api"));
    }

    #[test]
    fn test_unsupported_version() {
        let err = JsonGraphPersistence
            .decode(br#"{"version": 7, "vertices": [], "edges": []}"#)
            .unwrap_err();
        assert!(matches!(err, PersistenceError::UnsupportedVersion { found: 7, expected: 1 }));
    }

    #[test]
    fn test_dangling_edge_is_rejected() {
        let doc = br#"{"version": 1, "vertices": [{"path": ":a"}], "edges": [{"source": ":a", "target": ":b"}]}"#;
        let err = JsonGraphPersistence.decode(doc).unwrap_err();
        assert!(matches!(err, PersistenceError::Graph(GraphError::UnknownVertex(_))));
    }

    #[test]
    fn test_duplicate_entries_are_combined() {
        let doc = br#"{
            "version": 1,
            "vertices": [
                {"path": ":a", "attributes": {"x": {"type": "int", "value": "1"}}},
                {"path": ":b"},
                {"path": ":a", "attributes": {"y": {"type": "int", "value": "2"}}}
            ],
            "edges": [
                {"source": ":a", "target": ":b", "attributes": {"scope": {"type": "string", "value": "api"}}},
                {"source": ":a", "target": ":b", "attributes": {
                    "scope": {"type": "string", "value": "impl"},
                    "weight": {"type": "int", "value": "3"}
                }}
            ]
        }"#;
        let graph = JsonGraphPersistence.decode(doc).unwrap();

        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        let a = graph.find_vertex(":a").unwrap();
        assert_eq!(a.attributes["x"], Attribute::int(1));
        assert_eq!(a.attributes["y"], Attribute::int(2));
        let edge = graph.edge(&VertexId::new(":a"), &VertexId::new(":b")).unwrap();
        assert_eq!(edge.attributes["scope"], Attribute::string("impl"));
        assert_eq!(edge.attributes["weight"], Attribute::int(3));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonGraphPersistence.load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
