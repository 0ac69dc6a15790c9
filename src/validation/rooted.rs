//! Graph elements paired with the root vertex a rule is evaluated for.
//!
//! Nested matchers navigate from vertex to edge to vertex; the rooted
//! wrappers keep the graph and the original root available at every step.

use std::collections::BTreeMap;
use std::fmt;

use crate::graph::AnalyticsGraph;
use crate::types::{Attribute, Attributed, EdgeInfo, VertexInfo};

/// A vertex under evaluation, with the rule's root vertex.
#[derive(Debug, Clone, Copy)]
pub struct RootedVertex<'g> {
    /// Graph the vertex belongs to.
    pub graph: &'g AnalyticsGraph,
    /// Vertex the rule is evaluated for.
    pub root: &'g VertexInfo,
    /// Vertex currently being matched.
    pub vertex: &'g VertexInfo,
}

impl<'g> RootedVertex<'g> {
    /// The root vertex itself.
    pub fn root(graph: &'g AnalyticsGraph, root: &'g VertexInfo) -> Self {
        Self {
            graph,
            root,
            vertex: root,
        }
    }

    /// Another vertex evaluated on behalf of `root`.
    pub fn new(graph: &'g AnalyticsGraph, root: &'g VertexInfo, vertex: &'g VertexInfo) -> Self {
        Self { graph, root, vertex }
    }

    /// Short form used in match descriptions.
    pub fn summary(&self) -> String {
        self.vertex.path().to_string()
    }

    /// Attributes of the current vertex, borrowed for the graph's lifetime.
    pub fn attribute_map(&self) -> &'g BTreeMap<String, Attribute> {
        &self.vertex.attributes
    }

    /// Outgoing edges of the current vertex, rooted at the same root.
    pub fn outgoing_edges(&self) -> Vec<RootedEdge<'g>> {
        let (graph, root) = (self.graph, self.root);
        graph
            .outgoing_edges(self.vertex.path())
            .map(|edge| RootedEdge::new(graph, root, edge))
            .collect()
    }
}

impl Attributed for RootedVertex<'_> {
    fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.vertex.attributes
    }
}

impl fmt::Display for RootedVertex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vertex.path())
    }
}

/// An edge under evaluation, with the rule's root vertex.
#[derive(Debug, Clone, Copy)]
pub struct RootedEdge<'g> {
    /// Graph the edge belongs to.
    pub graph: &'g AnalyticsGraph,
    /// Vertex the rule is evaluated for.
    pub root: &'g VertexInfo,
    /// Edge currently being matched.
    pub edge: &'g EdgeInfo,
}

impl<'g> RootedEdge<'g> {
    /// Wrap `edge`.
    pub fn new(graph: &'g AnalyticsGraph, root: &'g VertexInfo, edge: &'g EdgeInfo) -> Self {
        Self { graph, root, edge }
    }

    /// Short form used in match descriptions: `source -> target`.
    pub fn summary(&self) -> String {
        format!("{} -> {}", self.edge.source(), self.edge.target())
    }

    /// Attributes of the edge, borrowed for the graph's lifetime.
    pub fn attribute_map(&self) -> &'g BTreeMap<String, Attribute> {
        &self.edge.attributes
    }

    /// The edge's source vertex, if present in the graph.
    pub fn source(&self) -> Option<RootedVertex<'g>> {
        self.graph
            .vertex(self.edge.source())
            .map(|vertex| RootedVertex::new(self.graph, self.root, vertex))
    }

    /// The edge's target vertex, if present in the graph.
    pub fn target(&self) -> Option<RootedVertex<'g>> {
        self.graph
            .vertex(self.edge.target())
            .map(|vertex| RootedVertex::new(self.graph, self.root, vertex))
    }
}

impl Attributed for RootedEdge<'_> {
    fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.edge.attributes
    }
}

impl fmt::Display for RootedEdge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VertexId;

    #[test]
    fn test_navigation_keeps_root() {
        let mut graph = AnalyticsGraph::new();
        graph.add_vertex(VertexInfo::new(":app"));
        graph.add_vertex(VertexInfo::new(":lib"));
        graph.add_edge(EdgeInfo::new(":app", ":lib")).unwrap();

        let root = graph.find_vertex(":app").unwrap();
        let rooted = RootedVertex::root(&graph, root);
        let edges = rooted.outgoing_edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].summary(), ":app -> :lib");

        let target = edges[0].target().unwrap();
        assert_eq!(*target.vertex.path(), VertexId::new(":lib"));
        assert_eq!(*target.root.path(), VertexId::new(":app"));
        assert_eq!(target.summary(), ":lib");
    }
}
