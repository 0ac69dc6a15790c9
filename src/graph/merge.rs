//! Graph merge: unify vertices by identity, fold duplicate edges together.

use tracing::debug;

use super::{AnalyticsGraph, GraphError};
use crate::types::{EdgeInfo, VertexInfo};

impl AnalyticsGraph {
    /// Merge `other` into `self`.
    ///
    /// Vertices are unified by identity; on attribute-name collision the
    /// incoming value wins. An edge that already exists between the same
    /// endpoints is replaced by a fresh edge carrying the old attributes
    /// overlaid with the incoming ones. Merging the same graph twice is a
    /// no-op the second time.
    pub fn merge(&mut self, other: &AnalyticsGraph) -> Result<(), GraphError> {
        let vertices_before = self.vertex_count();
        let edges_before = self.edge_count();

        for vertex in other.vertices() {
            self.merge_vertex(vertex)?;
        }

        for incoming in other.edges() {
            let source = other
                .vertex(incoming.source())
                .ok_or_else(|| GraphError::UnknownVertex(incoming.source().clone()))?;
            let target = other
                .vertex(incoming.target())
                .ok_or_else(|| GraphError::UnknownVertex(incoming.target().clone()))?;
            self.merge_vertex(source)?;
            self.merge_vertex(target)?;

            let mut replacement = EdgeInfo::new(incoming.source().clone(), incoming.target().clone());
            if let Some(stale) = self.remove_edge(incoming.source(), incoming.target()) {
                replacement.attributes.extend(stale.attributes);
            }
            replacement
                .attributes
                .extend(incoming.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
            self.add_edge(replacement)?;
        }

        debug!(
            added_vertices = self.vertex_count() - vertices_before,
            added_edges = self.edge_count() - edges_before,
            "merged graph"
        );
        Ok(())
    }

    /// Merge every graph of `graphs` into a fresh graph, in order.
    pub fn merge_all<'a, I>(graphs: I) -> Result<AnalyticsGraph, GraphError>
    where
        I: IntoIterator<Item = &'a AnalyticsGraph>,
    {
        let mut merged = AnalyticsGraph::new();
        for graph in graphs {
            merged.merge(graph)?;
        }
        Ok(merged)
    }

    fn merge_vertex(&mut self, vertex: &VertexInfo) -> Result<(), GraphError> {
        match self.vertices.get_mut(vertex.path()) {
            Some(existing) => union_vertex(existing, vertex),
            None => {
                self.add_vertex(vertex.clone());
                Ok(())
            }
        }
    }
}

/// Union `incoming`'s attributes into `existing` (incoming wins).
///
/// Both must carry the same identity key.
pub(crate) fn union_vertex(existing: &mut VertexInfo, incoming: &VertexInfo) -> Result<(), GraphError> {
    if existing.path() != incoming.path() {
        return Err(GraphError::IdentityMismatch {
            existing: existing.path().clone(),
            incoming: incoming.path().clone(),
        });
    }
    existing.attributes.extend(
        incoming
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), value.clone())),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attribute, VertexId};

    fn make_graph(vertices: &[VertexInfo], edges: &[EdgeInfo]) -> AnalyticsGraph {
        let mut graph = AnalyticsGraph::new();
        for vertex in vertices {
            graph.add_vertex(vertex.clone());
        }
        for edge in edges {
            graph.add_edge(edge.clone()).unwrap();
        }
        graph
    }

    #[test]
    fn test_vertex_union_of_disjoint_attributes() {
        let mut a = make_graph(&[VertexInfo::new(":app").with_attribute("x", Attribute::int(1))], &[]);
        let b = make_graph(&[VertexInfo::new(":app").with_attribute("y", Attribute::int(2))], &[]);

        a.merge(&b).unwrap();

        assert_eq!(a.vertex_count(), 1);
        let app = a.find_vertex(":app").unwrap();
        assert_eq!(app.attributes.len(), 2);
        assert_eq!(app.attributes["x"], Attribute::int(1));
        assert_eq!(app.attributes["y"], Attribute::int(2));
    }

    #[test]
    fn test_incoming_value_wins_on_collision() {
        let mut a = make_graph(&[VertexInfo::new(":app").with_attribute("x", Attribute::int(1))], &[]);
        let b = make_graph(&[VertexInfo::new(":app").with_attribute("x", Attribute::int(9))], &[]);

        a.merge(&b).unwrap();
        assert_eq!(a.find_vertex(":app").unwrap().attributes["x"], Attribute::int(9));
    }

    #[test]
    fn test_duplicate_edges_are_combined() {
        let vertices = [VertexInfo::new(":a"), VertexInfo::new(":b")];
        let mut a = make_graph(
            &vertices,
            &[EdgeInfo::new(":a", ":b")
                .with_attribute("scope", Attribute::string("api"))
                .with_attribute("weight", Attribute::int(1))],
        );
        let b = make_graph(
            &vertices,
            &[EdgeInfo::new(":a", ":b").with_attribute("weight", Attribute::int(5))],
        );

        a.merge(&b).unwrap();

        assert_eq!(a.edge_count(), 1);
        let edge = a.edge(&VertexId::new(":a"), &VertexId::new(":b")).unwrap();
        assert_eq!(edge.attributes["scope"], Attribute::string("api"));
        assert_eq!(edge.attributes["weight"], Attribute::int(5));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut a = make_graph(&[VertexInfo::new(":a").with_attribute("x", Attribute::int(1))], &[]);
        let b = make_graph(
            &[
                VertexInfo::new(":a").with_attribute("x", Attribute::int(2)),
                VertexInfo::new(":b"),
            ],
            &[EdgeInfo::new(":a", ":b").with_attribute("w", Attribute::int(3))],
        );

        a.merge(&b).unwrap();
        let once = a.fingerprint().unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.fingerprint().unwrap(), once);
    }

    #[test]
    fn test_union_rejects_identity_mismatch() {
        let mut existing = VertexInfo::new(":a");
        let err = union_vertex(&mut existing, &VertexInfo::new(":b")).unwrap_err();
        assert!(matches!(err, GraphError::IdentityMismatch { .. }));
    }

    #[test]
    fn test_merge_all_consolidates_in_order() {
        let first = make_graph(&[VertexInfo::new(":a").with_attribute("v", Attribute::int(1))], &[]);
        let second = make_graph(
            &[VertexInfo::new(":a").with_attribute("v", Attribute::int(2)), VertexInfo::new(":b")],
            &[EdgeInfo::new(":a", ":b")],
        );

        let merged = AnalyticsGraph::merge_all([&first, &second]).unwrap();
        assert_eq!(merged.vertex_count(), 2);
        assert_eq!(merged.edge_count(), 1);
        assert_eq!(merged.find_vertex(":a").unwrap().attributes["v"], Attribute::int(2));
    }
}
