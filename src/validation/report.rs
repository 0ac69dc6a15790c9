//! Text reports for validation results.

use std::fmt::Write as _;
use tracing::info;

use super::reconcile::{validate_graph, GraphValidation, ValidationOutcome};
use super::rule::ValidationConfig;
use super::ValidationError;
use crate::graph::AnalyticsGraph;

const DETAIL_INDENT: &str = "        ";

/// Combined report and error count across every validated graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRun {
    /// Reports of every graph, separated by blank lines.
    pub report: String,
    /// Unignored violations plus stale ignores, summed over all graphs.
    pub error_count: usize,
}

impl ValidationRun {
    /// Whether every graph passed.
    pub fn is_success(&self) -> bool {
        self.error_count == 0
    }

    /// `Ok(report)` when clean, otherwise [`ValidationError::Failed`].
    pub fn into_result(self) -> Result<String, ValidationError> {
        if self.error_count > 0 {
            Err(ValidationError::Failed {
                count: self.error_count,
                report: self.report,
            })
        } else {
            Ok(self.report)
        }
    }
}

/// Validate the vertex `root_path` in each named graph.
///
/// Graphs without that vertex are skipped and reported as such.
pub fn validate_graphs<'g, I, S>(graphs: I, root_path: &str, config: &ValidationConfig) -> ValidationRun
where
    I: IntoIterator<Item = (S, &'g AnalyticsGraph)>,
    S: Into<String>,
{
    let mut reports = Vec::new();
    let mut error_count = 0;
    for (graph_id, graph) in graphs {
        let outcome = validate_graph(graph_id, graph, root_path, config);
        error_count += outcome.error_count();
        reports.push(render_outcome(&outcome, root_path));
    }
    info!(graphs = reports.len(), errors = error_count, root = root_path, "validation complete");
    ValidationRun {
        report: reports.join("\n"),
        error_count,
    }
}

/// Report for a single graph.
pub fn render_outcome(outcome: &ValidationOutcome<'_>, root_path: &str) -> String {
    let summary = match outcome {
        ValidationOutcome::VertexNotFound { .. } => format!(
            "Project path {} not found in graph.  Validation skipped.\n",
            root_path
        ),
        ValidationOutcome::Evaluated(validation) => render_validation(validation),
    };
    format!(
        "=== Validation using graph analysis: {}\n\n{}\n",
        outcome.graph_id(),
        summary
    )
}

fn render_validation(validation: &GraphValidation<'_>) -> String {
    let mut out = String::new();

    if !validation.violations.is_empty() {
        let _ = writeln!(out, "ERROR: {} rule(s) violations found:", validation.violations.len());
        for (id, rule) in &validation.violations {
            let _ = writeln!(out, "Rule: {}", id);
            let _ = writeln!(out, "    Description:");
            let _ = writeln!(out, "{}", indent_lines(&rule.reason, DETAIL_INDENT));
            let _ = writeln!(out, "    Details:");
            let details = rule
                .matcher
                .matches_vertex(validation.root.graph, validation.root.vertex)
                .render(true, DETAIL_INDENT);
            let _ = writeln!(out, "{}", details);
        }
    }

    if !validation.ignored_but_valid.is_empty() {
        let _ = writeln!(out, "ERROR: Ignored rule(s) which did not have any violations:");
        for id in &validation.ignored_but_valid {
            let _ = writeln!(out, "    {}", id);
        }
    }

    if !validation.ignored_violations.is_empty() {
        let _ = writeln!(
            out,
            "INFO {} ignored rule violation(s) found:",
            validation.ignored_violations.len()
        );
        for id in validation.ignored_violations.keys() {
            let _ = writeln!(out, "    {}", id);
        }
    }

    if validation.is_clean() {
        let _ = writeln!(out, "SUCCESS: No graph issues found.");
    }
    out
}

fn indent_lines(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", indent, line))
        .collect::<Vec<_>>()
        .join("\n")
}
