//! Values a matcher can be applied to.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{Attribute, Number};
use crate::validation::rooted::{RootedEdge, RootedVertex};

/// Input to [`Matcher::matches`](super::Matcher::matches).
#[derive(Debug, Clone)]
pub enum MatchValue<'g> {
    /// A vertex with its rule root.
    Vertex(RootedVertex<'g>),
    /// An edge with its rule root.
    Edge(RootedEdge<'g>),
    /// A sequence of edges (e.g. outgoing edges of a vertex).
    Edges(Vec<RootedEdge<'g>>),
    /// A string, absent when an attribute was missing.
    Text(Option<String>),
    /// A number, absent when an attribute was missing or not numeric.
    Number(Option<Number>),
    /// A boolean (missing attributes read as `false`).
    Bool(bool),
}

impl<'g> MatchValue<'g> {
    /// Name of the value's kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Vertex(_) => "vertex",
            Self::Edge(_) => "edge",
            Self::Edges(_) => "edge list",
            Self::Text(_) => "string",
            Self::Number(_) => "number",
            Self::Bool(_) => "boolean",
        }
    }

    /// Summary prefix for rooted values (`:path` or `:a -> :b`).
    pub fn summary(&self) -> Option<String> {
        match self {
            Self::Vertex(v) => Some(v.summary()),
            Self::Edge(e) => Some(e.summary()),
            _ => None,
        }
    }

    /// Prefix `description` with the summary of rooted values.
    pub fn summarized(&self, description: &str) -> String {
        match self.summary() {
            Some(summary) => format!("[{}] {}", summary, description),
            None => description.to_string(),
        }
    }

    /// Attribute bag of vertex and edge values.
    pub fn attribute_map(&self) -> Option<&'g BTreeMap<String, Attribute>> {
        match self {
            Self::Vertex(v) => Some(v.attribute_map()),
            Self::Edge(e) => Some(e.attribute_map()),
            _ => None,
        }
    }

    /// Quoted form: `<null>` for absent values, bare numbers, `'...'` otherwise.
    pub fn quoted(&self) -> String {
        match self {
            Self::Text(None) | Self::Number(None) => "<null>".to_string(),
            Self::Number(Some(n)) => n.to_string(),
            other => format!("'{}'", other),
        }
    }
}

impl fmt::Display for MatchValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex(v) => write!(f, "{}", v),
            Self::Edge(e) => write!(f, "{}", e),
            Self::Edges(edges) => {
                let parts: Vec<String> = edges.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Text(Some(s)) => write!(f, "{}", s),
            Self::Text(None) | Self::Number(None) => write!(f, "null"),
            Self::Number(Some(n)) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Quote an optional attribute the way match descriptions show it.
pub(crate) fn quote_attribute(attribute: Option<&Attribute>) -> String {
    match attribute {
        None => "<null>".to_string(),
        Some(attr) => format!("'{}'", attr.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AnalyticsGraph;
    use crate::types::{EdgeInfo, VertexInfo};

    #[test]
    fn test_quoting() {
        assert_eq!(MatchValue::Text(None).quoted(), "<null>");
        assert_eq!(MatchValue::Text(Some("a".into())).quoted(), "'a'");
        assert_eq!(MatchValue::Number(Some(Number::Int(3))).quoted(), "3");
        assert_eq!(MatchValue::Bool(true).quoted(), "'true'");
    }

    #[test]
    fn test_summarized_only_for_rooted_values() {
        let mut graph = AnalyticsGraph::new();
        graph.add_vertex(VertexInfo::new(":a"));
        graph.add_vertex(VertexInfo::new(":b"));
        graph.add_edge(EdgeInfo::new(":a", ":b")).unwrap();
        let root = graph.find_vertex(":a").unwrap();
        let vertex = MatchValue::Vertex(RootedVertex::root(&graph, root));
        let edges = MatchValue::Edges(RootedVertex::root(&graph, root).outgoing_edges());

        assert_eq!(vertex.summarized("not"), "[:a] not");
        assert_eq!(MatchValue::Bool(false).summarized("not"), "not");
        assert_eq!(edges.to_string(), "[:a -> :b]");
    }
}
