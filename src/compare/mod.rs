//! Before/after comparison of two snapshots of the same graph.
//!
//! Vertices are matched by identity. Every attribute present on both sides
//! of a matched vertex becomes a [`ComparisonChange`]; changes whose values
//! compare equal are kept for the per-attribute tallies but left out of the
//! per-vertex delta listing.

mod change;
mod report;

pub use change::{ComparisonChange, Direction};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::graph::AnalyticsGraph;
use crate::types::VertexId;

/// Aggregate statistic over one attribute's numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    /// Sum of values.
    Sum,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
    /// Arithmetic mean.
    Average,
}

impl Statistic {
    /// All statistics in report order.
    pub const ALL: [Statistic; 4] = [Self::Sum, Self::Min, Self::Max, Self::Average];

    fn label(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Average => "average",
        }
    }

    fn compute(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        Some(match self {
            Self::Sum => sum,
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Average => sum / values.len() as f64,
        })
    }
}

/// A statistic before and after.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatDelta {
    /// Which statistic.
    pub statistic: Statistic,
    /// Value over the original snapshot.
    pub before: f64,
    /// Value over the changed snapshot.
    pub after: f64,
}

impl StatDelta {
    /// `after - before`.
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }

    /// Delta relative to `before`, in percent. Infinite when `before` is
    /// zero and the delta is not.
    pub fn percentage(&self) -> f64 {
        self.delta() / self.before * 100.0
    }
}

/// Tallies and statistics for one attribute name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSummary {
    /// Attribute name.
    pub name: String,
    /// Values that increased.
    pub increased: usize,
    /// Values that decreased.
    pub decreased: usize,
    /// Values that compared equal.
    pub unchanged: usize,
    /// Aggregate statistics; empty for non-numeric attributes.
    pub stats: Vec<StatDelta>,
}

/// Result of comparing two graphs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Vertex count before.
    pub vertices_before: usize,
    /// Vertex count after.
    pub vertices_after: usize,
    /// Edge count before.
    pub edges_before: usize,
    /// Edge count after.
    pub edges_after: usize,
    /// Every attribute present on both sides of a matched vertex.
    pub changes: Vec<ComparisonChange>,
}

impl ComparisonReport {
    /// Changes whose value actually moved.
    pub fn deltas(&self) -> impl Iterator<Item = &ComparisonChange> {
        self.changes.iter().filter(|c| c.is_delta())
    }

    /// Moved values grouped by vertex, in vertex order.
    pub fn deltas_by_vertex(&self) -> BTreeMap<&VertexId, Vec<&ComparisonChange>> {
        let mut grouped: BTreeMap<&VertexId, Vec<&ComparisonChange>> = BTreeMap::new();
        for change in self.deltas() {
            grouped.entry(&change.vertex).or_default().push(change);
        }
        grouped
    }

    /// One summary per attribute name seen in any change, in name order.
    pub fn attribute_summaries(&self) -> Vec<AttributeSummary> {
        let names: BTreeSet<&str> = self.changes.iter().map(|c| c.attribute.as_str()).collect();
        names
            .into_iter()
            .map(|name| {
                let changes: Vec<&ComparisonChange> =
                    self.changes.iter().filter(|c| c.attribute == name).collect();
                let count = |direction: Direction| changes.iter().filter(|c| c.direction() == direction).count();

                let originals: Vec<f64> = changes.iter().filter_map(|c| c.original_number()).collect();
                let changed: Vec<f64> = changes.iter().filter_map(|c| c.changed_number()).collect();
                let stats = Statistic::ALL
                    .into_iter()
                    .filter_map(|statistic| {
                        Some(StatDelta {
                            statistic,
                            before: statistic.compute(&originals)?,
                            after: statistic.compute(&changed)?,
                        })
                    })
                    .collect();

                AttributeSummary {
                    name: name.to_string(),
                    increased: count(Direction::Increased),
                    decreased: count(Direction::Decreased),
                    unchanged: count(Direction::Unchanged),
                    stats,
                }
            })
            .collect()
    }
}

/// Compare `before` with `after`.
pub fn compare_graphs(before: &AnalyticsGraph, after: &AnalyticsGraph) -> ComparisonReport {
    let mut changes = Vec::new();
    for base in before.vertices() {
        let Some(changed) = after.vertex(base.path()) else {
            continue;
        };
        for (name, base_attr) in &base.attributes {
            if let Some(changed_attr) = changed.attributes.get(name) {
                changes.push(ComparisonChange {
                    vertex: base.path().clone(),
                    attribute: name.clone(),
                    attr_type: base_attr.attr_type,
                    original: base_attr.value.clone(),
                    changed: changed_attr.value.clone(),
                });
            }
        }
    }

    let report = ComparisonReport {
        vertices_before: before.vertex_count(),
        vertices_after: after.vertex_count(),
        edges_before: before.edge_count(),
        edges_after: after.edge_count(),
        changes,
    };
    debug!(
        changes = report.changes.len(),
        deltas = report.deltas().count(),
        "compared graphs"
    );
    report
}
