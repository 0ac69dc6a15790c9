//! Text rendering of a [`ComparisonReport`].

use std::fmt::Write as _;

use super::{ComparisonReport, StatDelta};

impl ComparisonReport {
    /// Render the comparison as a text report.
    ///
    /// Statistic lines whose delta is zero are omitted. A non-zero delta
    /// from a zero base renders its percentage as `∞%` or `-∞%`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let by_vertex = self.deltas_by_vertex();

        let _ = writeln!(out, "Graph nodes: {} before, {} after", self.vertices_before, self.vertices_after);
        let _ = writeln!(out, "Graph edges: {} before, {} after", self.edges_before, self.edges_after);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} project(s) reporting a total of {} change(s)",
            by_vertex.len(),
            self.deltas().count()
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "Aggregate metric changes:");
        for summary in self.attribute_summaries() {
            let _ = writeln!(
                out,
                "\t{}: {} decreased, {} stayed the same, {} increased",
                summary.name, summary.decreased, summary.unchanged, summary.increased
            );
            for stat in summary.stats.iter().filter(|s| s.delta() != 0.0) {
                let _ = writeln!(out, "\t\t{}", render_stat(stat));
            }
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "Deltas by project:");
        for (vertex, changes) in by_vertex {
            let _ = writeln!(out, "{}:", vertex);
            for change in changes {
                let _ = writeln!(out, "\t{}", change);
            }
        }
        out
    }
}

fn render_stat(stat: &StatDelta) -> String {
    format!(
        "{}: {} -> {} (delta: {} / {})",
        stat.statistic.label(),
        format_value(stat.before),
        format_value(stat.after),
        format_value(stat.delta()),
        format_percentage(stat)
    )
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn format_percentage(stat: &StatDelta) -> String {
    let percentage = stat.percentage();
    if percentage.is_infinite() {
        if percentage > 0.0 { "∞%" } else { "-∞%" }.to_string()
    } else {
        format!("{:.2}%", percentage)
    }
}

#[cfg(test)]
mod tests {
    use crate::compare::compare_graphs;
    use crate::graph::AnalyticsGraph;
    use crate::types::{Attribute, EdgeInfo, VertexInfo};

    fn make_graph(degrees: &[(&str, i32)], edges: &[(&str, &str)]) -> AnalyticsGraph {
        let mut graph = AnalyticsGraph::new();
        for (path, degree) in degrees {
            graph.add_vertex(VertexInfo::new(*path).with_attribute("degree", Attribute::int(*degree)));
        }
        for (source, target) in edges {
            graph.add_edge(EdgeInfo::new(*source, *target)).unwrap();
        }
        graph
    }

    #[test]
    fn test_render_self_comparison() {
        let graph = make_graph(&[(":a", 1), (":b", 1)], &[(":a", ":b")]);
        let expected = "\
Graph nodes: 2 before, 2 after
Graph edges: 1 before, 1 after

0 project(s) reporting a total of 0 change(s)

Aggregate metric changes:
\tdegree: 0 decreased, 2 stayed the same, 0 increased

Deltas by project:
";
        assert_eq!(compare_graphs(&graph, &graph).render(), expected);
    }

    #[test]
    fn test_render_with_deltas() {
        let before = make_graph(&[(":a", 2), (":b", 2)], &[(":a", ":b")]);
        let after = make_graph(&[(":a", 3), (":b", 2), (":c", 0)], &[(":a", ":b"), (":a", ":c")]);
        let expected = "\
Graph nodes: 2 before, 3 after
Graph edges: 1 before, 2 after

1 project(s) reporting a total of 1 change(s)

Aggregate metric changes:
\tdegree: 0 decreased, 1 stayed the same, 1 increased
\t\tsum: 4 -> 5 (delta: 1 / 25.00%)
\t\tmax: 2 -> 3 (delta: 1 / 50.00%)
\t\taverage: 2 -> 2.50 (delta: 0.50 / 25.00%)

Deltas by project:
:a:
\tdegree increased from 2 to 3
";
        assert_eq!(compare_graphs(&before, &after).render(), expected);
    }

    #[test]
    fn test_render_zero_base() {
        let before = make_graph(&[(":a", 0)], &[]);
        let after = make_graph(&[(":a", 4)], &[]);
        let report = compare_graphs(&before, &after).render();
        assert!(report.contains("\t\tsum: 0 -> 4 (delta: 4 / ∞%)\n"));
    }
}
