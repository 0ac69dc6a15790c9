//! Reconcile rule results with overrides and the ignore list.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::rooted::RootedVertex;
use super::rule::{ValidationConfig, ValidationRule};
use crate::graph::AnalyticsGraph;

/// Validation of one graph against one rule set.
#[derive(Debug, Clone)]
pub struct GraphValidation<'g> {
    /// Identifies the graph in reports (e.g. its file name).
    pub graph_id: String,
    /// Root vertex the rules were evaluated for.
    pub root: RootedVertex<'g>,
    /// Violated rules not on the ignore list.
    pub violations: BTreeMap<String, ValidationRule>,
    /// Violated rules on the ignore list.
    pub ignored_violations: BTreeMap<String, ValidationRule>,
    /// Ignore-list entries that had nothing to suppress.
    pub ignored_but_valid: Vec<String>,
}

impl GraphValidation<'_> {
    /// Errors contributed by this graph: unignored violations plus stale ignores.
    pub fn error_count(&self) -> usize {
        self.violations.len() + self.ignored_but_valid.len()
    }

    /// Whether the graph produced no findings at all.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.ignored_violations.is_empty() && self.ignored_but_valid.is_empty()
    }
}

/// Result of validating one graph.
#[derive(Debug, Clone)]
pub enum ValidationOutcome<'g> {
    /// The root vertex is not in this graph; validation was skipped.
    VertexNotFound {
        /// Identifies the graph in reports.
        graph_id: String,
    },
    /// Rules were evaluated.
    Evaluated(GraphValidation<'g>),
}

impl ValidationOutcome<'_> {
    /// Identifies the graph in reports.
    pub fn graph_id(&self) -> &str {
        match self {
            Self::VertexNotFound { graph_id } => graph_id,
            Self::Evaluated(validation) => &validation.graph_id,
        }
    }

    /// Errors contributed by this graph (zero when skipped).
    pub fn error_count(&self) -> usize {
        match self {
            Self::VertexNotFound { .. } => 0,
            Self::Evaluated(validation) => validation.error_count(),
        }
    }
}

/// Evaluate `config` against the vertex `root_path` of `graph`.
///
/// ## Steps
///
/// 1. Skip if the root vertex is absent
/// 2. Apply overrides to get the effective rules
/// 3. A rule is violated iff its matcher matches the root vertex
/// 4. Split violations by the ignore list
/// 5. Ignore entries without a violation are reported as stale
pub fn validate_graph<'g>(
    graph_id: impl Into<String>,
    graph: &'g AnalyticsGraph,
    root_path: &str,
    config: &ValidationConfig,
) -> ValidationOutcome<'g> {
    let graph_id = graph_id.into();
    let Some(root_vertex) = graph.find_vertex(root_path) else {
        debug!(graph = %graph_id, root = root_path, "root vertex not in graph, skipping");
        return ValidationOutcome::VertexNotFound { graph_id };
    };
    let root = RootedVertex::root(graph, root_vertex);

    let mut violations = BTreeMap::new();
    let mut ignored_violations = BTreeMap::new();
    for (id, rule) in config.effective_rules() {
        if !rule.matcher.matches_vertex(graph, root_vertex).matched {
            continue;
        }
        if config.ignore.contains(&id) {
            ignored_violations.insert(id, rule);
        } else {
            violations.insert(id, rule);
        }
    }

    let ignored_but_valid: Vec<String> = config
        .ignore
        .iter()
        .filter(|id| !ignored_violations.contains_key(*id))
        .cloned()
        .collect();
    if !ignored_but_valid.is_empty() {
        warn!(graph = %graph_id, stale = ?ignored_but_valid, "ignored rules without violations");
    }

    ValidationOutcome::Evaluated(GraphValidation {
        graph_id,
        root,
        violations,
        ignored_violations,
        ignored_but_valid,
    })
}
