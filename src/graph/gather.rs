//! Assemble one module's view of the graph from its own vertex, the graphs
//! contributed by its dependencies, and explicitly declared relations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::{AnalyticsGraph, GraphError};
use crate::types::{Attribute, EdgeInfo, VertexId, VertexInfo};

/// An explicitly declared dependency `from -> to` with edge attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRelation {
    /// Depending module.
    pub from: VertexId,
    /// Module depended upon.
    pub to: VertexId,
    /// Attributes for the resulting edge.
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
}

impl GraphRelation {
    /// Create a relation with no edge attributes.
    pub fn new(from: impl Into<VertexId>, to: impl Into<VertexId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style edge attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: Attribute) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

impl AnalyticsGraph {
    /// Build a module's graph.
    ///
    /// Starts from `self_vertex`, merges every contributed graph in order,
    /// then adds each relation as an edge. Relation attributes are folded
    /// into an existing edge between the same endpoints. A relation naming
    /// a vertex that is not in the graph fails with
    /// [`GraphError::RelationEndpointMissing`].
    pub fn gather<'a, I>(
        self_vertex: VertexInfo,
        contributed: I,
        relations: &[GraphRelation],
    ) -> Result<AnalyticsGraph, GraphError>
    where
        I: IntoIterator<Item = &'a AnalyticsGraph>,
    {
        let mut graph = AnalyticsGraph::new();
        let root = self_vertex.path().clone();
        graph.add_vertex(self_vertex);

        for subgraph in contributed {
            graph.merge(subgraph)?;
        }

        for relation in relations {
            for (side, path) in [("from", &relation.from), ("to", &relation.to)] {
                if !graph.contains_vertex(path) {
                    return Err(GraphError::RelationEndpointMissing {
                        side,
                        path: path.clone(),
                    });
                }
            }
            let mut edge = EdgeInfo::new(relation.from.clone(), relation.to.clone());
            edge.attributes = relation.attributes.clone();
            if !graph.add_edge(edge)? {
                if let Some(existing) = graph.edge_attributes_mut(&relation.from, &relation.to) {
                    existing.extend(relation.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        debug!(
            root = %root,
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "gathered module graph"
        );
        Ok(graph)
    }
}
