//! Inspection report for a single vertex.
//!
//! The report has three sections:
//!
//! 1. Dependency cycles through the vertex (deadline bounded)
//! 2. For every numeric attribute of its transitive dependencies, the top N
//!    dependencies by that attribute
//! 3. The dependency tree

mod cycles;
mod tree;

pub use cycles::{detect_cycles, CycleSearch};
pub use tree::{numeric_attribute_names, render_dependency_tree, top_by_metric, transitive_dependencies};

use std::fmt::Write as _;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

use crate::graph::AnalyticsGraph;

/// Errors from [`inspect`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectionError {
    /// No vertex has the requested path.
    #[error("Project path not found in graph: {0}")]
    VertexNotFound(String),
}

/// Inspection limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionOptions {
    /// Wall-clock budget for cycle detection.
    pub max_traversal: Duration,
    /// Entries per top-N listing.
    pub top_n: usize,
}

impl Default for InspectionOptions {
    fn default() -> Self {
        Self {
            max_traversal: Duration::from_secs(5 * 60),
            top_n: 10,
        }
    }
}

/// Build the inspection report for the vertex at `path`.
pub fn inspect(graph: &AnalyticsGraph, path: &str, options: &InspectionOptions) -> Result<String, InspectionError> {
    let vertex = graph
        .find_vertex(path)
        .ok_or_else(|| InspectionError::VertexNotFound(path.to_string()))?;
    let root = vertex.path();

    let mut out = String::new();
    let _ = writeln!(out, "Project inspection report for: {} {}", root, vertex.attribute_summary());
    let _ = writeln!(out);

    // Cycles
    let search = detect_cycles(graph, root, Instant::now() + options.max_traversal);
    if !search.complete {
        warn!(vertex = %root, budget = ?options.max_traversal, "cycle detection timed out");
        let _ = writeln!(
            out,
            "WARNING: Project graph traversal has exceeded the maximum duration of {:?}.",
            options.max_traversal
        );
        let _ = writeln!(out, "         Cycle detection will be incomplete.  This can happen when the module being inspected");
        let _ = writeln!(out, "         has a very large dependency graph.  Consider breaking up the module into a set of smaller,");
        let _ = writeln!(out, "         more cohesive modules.");
    }
    if search.cycles.is_empty() {
        let _ = writeln!(out, "No project dependency cycles involving {} were detected.", root);
    } else {
        let _ = writeln!(
            out,
            "{} project dependency cycle(s) involving {} were detected:",
            search.cycles.len(),
            root
        );
        for (index, cycle) in search.cycles.iter().enumerate() {
            let joined: Vec<&str> = cycle.iter().map(|v| v.as_str()).collect();
            let _ = writeln!(out, "{}: {}", index + 1, joined.join(" --> "));
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Projects involved in cycles, by frequency of occurrence:");
        for (vertex, count) in search.frequencies(root) {
            let _ = writeln!(out, "\t{}: {}", count, vertex);
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out);

    // Top N
    let dependencies = transitive_dependencies(graph, root);
    for attribute in numeric_attribute_names(&dependencies) {
        let top = top_by_metric(&dependencies, &attribute, options.top_n);
        if top.is_empty() {
            continue;
        }
        let _ = writeln!(out, "Top {} dependencies by '{}':", options.top_n, attribute);
        for (index, (dependency, _)) in top.iter().enumerate() {
            let value = dependency
                .attributes
                .get(&attribute)
                .map(|a| a.value.as_str())
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "\t{}: {} -- {} {}",
                index + 1,
                value,
                dependency.path(),
                dependency.attribute_summary()
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out);
    }

    // Tree
    let _ = writeln!(out, "Dependency tree:");
    out.push_str(&render_dependency_tree(graph, root));
    let _ = writeln!(out, "* Indicates a vertex that has already been rendered");

    info!(
        vertex = %root,
        cycles = search.cycles.len(),
        dependencies = dependencies.len(),
        "inspection complete"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attribute, EdgeInfo, VertexInfo};

    fn make_graph(edges: &[(&str, &str)]) -> AnalyticsGraph {
        let mut graph = AnalyticsGraph::new();
        for (source, target) in edges {
            for path in [source, target] {
                graph.add_vertex(VertexInfo::new(*path).with_attribute("size", Attribute::int(path.len() as i32)));
            }
            graph.add_edge(EdgeInfo::new(*source, *target)).unwrap();
        }
        graph
    }

    #[test]
    fn test_unknown_vertex() {
        let graph = make_graph(&[(":a", ":b")]);
        let err = inspect(&graph, ":missing", &InspectionOptions::default()).unwrap_err();
        assert_eq!(err, InspectionError::VertexNotFound(":missing".to_string()));
    }

    #[test]
    fn test_report_with_cycles() {
        let graph = make_graph(&[(":a", ":b"), (":b", ":a"), (":b", ":c"), (":c", ":a")]);
        let report = inspect(&graph, ":a", &InspectionOptions::default()).unwrap();
        let expected = "\
Project inspection report for: :a (size=2)

2 project dependency cycle(s) involving :a were detected:
1: :a --> :b --> :c --> :a
2: :a --> :b --> :a

Projects involved in cycles, by frequency of occurrence:
\t2: :b
\t1: :c


Top 10 dependencies by 'size':
\t1: 2 -- :b (size=2)
\t2: 2 -- :c (size=2)


Dependency tree:
:a (size=2)
    --> :b (size=2)
        --> :a *
        --> :c (size=2)
            --> :a *
* Indicates a vertex that has already been rendered
";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_report_without_cycles() {
        let graph = make_graph(&[(":app", ":lib")]);
        let options = InspectionOptions { top_n: 1, ..Default::default() };
        let report = inspect(&graph, ":app", &options).unwrap();
        assert!(report.contains("No project dependency cycles involving :app were detected.\n"));
        assert!(report.contains("Top 1 dependencies by 'size':\n\t1: 4 -- :lib (size=4)\n"));
        assert!(!report.contains("WARNING"));
    }

    #[test]
    fn test_timeout_warning() {
        let graph = make_graph(&[(":a", ":b"), (":b", ":a")]);
        let options = InspectionOptions { max_traversal: Duration::ZERO, ..Default::default() };
        let report = inspect(&graph, ":a", &options).unwrap();
        assert!(report.contains("Cycle detection will be incomplete"));
    }
}
