//! Transitive dependencies, top-N metric rankings and the dependency tree.

use std::collections::{BTreeSet, VecDeque};
use std::fmt::Write as _;

use crate::graph::AnalyticsGraph;
use crate::types::{VertexId, VertexInfo};

const TREE_INDENT: &str = "    ";
const TREE_ARROW: &str = "    --> ";

/// Every vertex reachable from `root` along outgoing edges, excluding `root`.
pub fn transitive_dependencies<'g>(graph: &'g AnalyticsGraph, root: &VertexId) -> Vec<&'g VertexInfo> {
    let mut seen: BTreeSet<&VertexId> = BTreeSet::new();
    let mut queue: VecDeque<&VertexId> = graph.successors(root).collect();
    while let Some(current) = queue.pop_front() {
        if current == root || !seen.insert(current) {
            continue;
        }
        queue.extend(graph.successors(current));
    }
    seen.into_iter().filter_map(|id| graph.vertex(id)).collect()
}

/// Numeric attribute names carried by any of `vertices`, sorted.
pub fn numeric_attribute_names(vertices: &[&VertexInfo]) -> BTreeSet<String> {
    vertices
        .iter()
        .flat_map(|v| v.attributes.iter())
        .filter(|(_, attr)| attr.attr_type.is_numeric())
        .map(|(name, _)| name.clone())
        .collect()
}

/// The `n` vertices with the highest numeric value of `attribute`.
///
/// Vertices without the attribute, or with a value that does not parse, are
/// skipped. Ties are ordered by path.
pub fn top_by_metric<'g>(vertices: &[&'g VertexInfo], attribute: &str, n: usize) -> Vec<(&'g VertexInfo, f64)> {
    let mut ranked: Vec<(&VertexInfo, f64)> = vertices
        .iter()
        .filter_map(|v| {
            let value = v.attributes.get(attribute)?.as_number()?.as_f64();
            Some((*v, value))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.path().cmp(b.0.path())));
    ranked.truncate(n);
    ranked
}

/// Indented tree of the dependencies of `root`.
///
/// A vertex is expanded with its attributes the first time it appears; later
/// appearances are marked with `*`. Self-loops are skipped.
pub fn render_dependency_tree(graph: &AnalyticsGraph, root: &VertexId) -> String {
    let mut out = String::new();
    if let Some(vertex) = graph.vertex(root) {
        let mut rendered = BTreeSet::new();
        render_vertex(graph, vertex, "", &mut rendered, &mut out);
    }
    out
}

fn render_vertex<'g>(
    graph: &'g AnalyticsGraph,
    vertex: &'g VertexInfo,
    indent: &str,
    rendered: &mut BTreeSet<&'g VertexId>,
    out: &mut String,
) {
    if !rendered.insert(vertex.path()) {
        let _ = writeln!(out, "{}{} *", indent, vertex.path());
        return;
    }
    let _ = writeln!(out, "{}{} {}", indent, vertex.path(), vertex.attribute_summary());

    let child_indent = if indent.is_empty() {
        TREE_ARROW.to_string()
    } else {
        format!("{}{}", TREE_INDENT, indent)
    };
    for target in graph.successors(vertex.path()) {
        if target == vertex.path() {
            continue;
        }
        if let Some(child) = graph.vertex(target) {
            render_vertex(graph, child, &child_indent, rendered, out);
        }
    }
}
