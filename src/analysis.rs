//! Graph annotation passes.
//!
//! Each pass computes a metric per vertex and writes it back as a typed
//! attribute. Passes never remove or rename existing attributes.
//!
//! ## Attributes written
//!
//! | Pass | Attributes |
//! |------|------------|
//! | [`BasicMetrics`] | `degree`, `inDegree`, `outDegree` |
//! | [`NetworkExpansion`] | `networkAbove`, `networkBelow`, `expansionFactor` |
//! | [`VertexHeightAnalysis`] | `height` |
//! | [`ExternalScoreAnalysis`] | caller-chosen, e.g. `betweennessCentrality` |

use std::collections::BTreeMap;
use tracing::{info, info_span};

use crate::graph::AnalyticsGraph;
use crate::scoring::{
    ExternalScores, ReachableNodes, ScoringError, TraversalDirection, VertexHeight, VertexScorer,
};
use crate::types::{Attribute, VertexId};

/// Attribute written by [`BasicMetrics`]: total degree.
pub const DEGREE: &str = "degree";
/// Attribute written by [`BasicMetrics`]: incoming edge count.
pub const IN_DEGREE: &str = "inDegree";
/// Attribute written by [`BasicMetrics`]: outgoing edge count.
pub const OUT_DEGREE: &str = "outDegree";
/// Attribute written by [`NetworkExpansion`]: reachable dependents.
pub const NETWORK_ABOVE: &str = "networkAbove";
/// Attribute written by [`NetworkExpansion`]: reachable dependencies.
pub const NETWORK_BELOW: &str = "networkBelow";
/// Attribute written by [`NetworkExpansion`]: `networkBelow * inDegree`.
pub const EXPANSION_FACTOR: &str = "expansionFactor";
/// Attribute written by [`VertexHeightAnalysis`].
pub const HEIGHT: &str = "height";
/// Conventional attribute for betweenness centrality scores.
pub const BETWEENNESS_CENTRALITY: &str = "betweennessCentrality";

/// Errors raised by analysis passes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// A prerequisite attribute was not written by an earlier pass.
    #[error("unable to load '{attribute}' attribute for vertex {vertex}; run the pass that produces it first")]
    MissingAttribute {
        /// Vertex lacking the attribute.
        vertex: VertexId,
        /// Required attribute name.
        attribute: String,
    },

    /// A derived metric does not fit in a `long`.
    #[error("'{attribute}' overflows for vertex {vertex}")]
    Overflow {
        /// Vertex whose metric overflowed.
        vertex: VertexId,
        /// Attribute being computed.
        attribute: String,
    },

    /// A scorer failed.
    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),
}

/// A pass that annotates every vertex of a graph.
pub trait GraphAnalysis {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Annotate `graph` in place.
    fn apply(&self, graph: &mut AnalyticsGraph) -> Result<(), AnalysisError>;
}

/// Integer attribute for a count, widening to `long` if it does not fit.
fn count_attribute(count: usize) -> Attribute {
    match i32::try_from(count) {
        Ok(value) => Attribute::int(value),
        Err(_) => Attribute::long(count as i64),
    }
}

/// Write one attribute per vertex from a score map.
fn write_scores<S>(
    graph: &mut AnalyticsGraph,
    name: &str,
    scores: BTreeMap<VertexId, S>,
    to_attribute: impl Fn(S) -> Attribute,
) {
    for (id, score) in scores {
        if let Some(attributes) = graph.vertex_attributes_mut(&id) {
            attributes.insert(name.to_string(), to_attribute(score));
        }
    }
}

/// Degree counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicMetrics;

impl GraphAnalysis for BasicMetrics {
    fn name(&self) -> &str {
        "basic-metrics"
    }

    fn apply(&self, graph: &mut AnalyticsGraph) -> Result<(), AnalysisError> {
        let degrees: Vec<(VertexId, usize, usize, usize)> = graph
            .vertex_ids()
            .map(|id| (id.clone(), graph.degree(id), graph.in_degree(id), graph.out_degree(id)))
            .collect();

        for (id, degree, in_degree, out_degree) in degrees {
            if let Some(attributes) = graph.vertex_attributes_mut(&id) {
                attributes.insert(DEGREE.to_string(), count_attribute(degree));
                attributes.insert(IN_DEGREE.to_string(), count_attribute(in_degree));
                attributes.insert(OUT_DEGREE.to_string(), count_attribute(out_degree));
            }
        }
        Ok(())
    }
}

/// Reachability in both directions and the resulting expansion factor.
///
/// Requires `inDegree`, so [`BasicMetrics`] must run first.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkExpansion;

impl GraphAnalysis for NetworkExpansion {
    fn name(&self) -> &str {
        "network-expansion"
    }

    fn apply(&self, graph: &mut AnalyticsGraph) -> Result<(), AnalysisError> {
        let above = ReachableNodes::new(graph, TraversalDirection::Incoming).all_scores()?;
        let below = ReachableNodes::new(graph, TraversalDirection::Outgoing).all_scores()?;

        let mut rows = Vec::with_capacity(below.len());
        for (id, below_value) in &below {
            let in_degree = graph
                .vertex(id)
                .and_then(|v| v.attributes.get(IN_DEGREE))
                .and_then(|a| a.value.trim().parse::<i64>().ok())
                .ok_or_else(|| AnalysisError::MissingAttribute {
                    vertex: id.clone(),
                    attribute: IN_DEGREE.to_string(),
                })?;
            let above_value = above.get(id).copied().unwrap_or(1);
            let expansion = i64::try_from(*below_value)
                .ok()
                .and_then(|below| below.checked_mul(in_degree))
                .ok_or_else(|| AnalysisError::Overflow {
                    vertex: id.clone(),
                    attribute: EXPANSION_FACTOR.to_string(),
                })?;
            rows.push((id.clone(), above_value, *below_value, expansion));
        }

        for (id, above_value, below_value, expansion) in rows {
            if let Some(attributes) = graph.vertex_attributes_mut(&id) {
                attributes.insert(NETWORK_ABOVE.to_string(), count_attribute(above_value));
                attributes.insert(NETWORK_BELOW.to_string(), count_attribute(below_value));
                let factor = match i32::try_from(expansion) {
                    Ok(value) => Attribute::int(value),
                    Err(_) => Attribute::long(expansion),
                };
                attributes.insert(EXPANSION_FACTOR.to_string(), factor);
            }
        }
        Ok(())
    }
}

/// Breadth-first level height of every vertex (see [`VertexHeight`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexHeightAnalysis;

impl GraphAnalysis for VertexHeightAnalysis {
    fn name(&self) -> &str {
        "vertex-height"
    }

    fn apply(&self, graph: &mut AnalyticsGraph) -> Result<(), AnalysisError> {
        let heights = VertexHeight::new(graph).all_scores()?;
        write_scores(graph, HEIGHT, heights, count_attribute);
        Ok(())
    }
}

/// Writes scores produced outside this crate as a `double` attribute.
#[derive(Debug, Clone)]
pub struct ExternalScoreAnalysis {
    attribute: String,
    scores: BTreeMap<VertexId, f64>,
}

impl ExternalScoreAnalysis {
    /// Write `scores` under `attribute`.
    pub fn new(attribute: impl Into<String>, scores: BTreeMap<VertexId, f64>) -> Self {
        Self {
            attribute: attribute.into(),
            scores,
        }
    }

    /// Betweenness centrality scores from a general graph library.
    pub fn betweenness_centrality(scores: BTreeMap<VertexId, f64>) -> Self {
        Self::new(BETWEENNESS_CENTRALITY, scores)
    }
}

impl GraphAnalysis for ExternalScoreAnalysis {
    fn name(&self) -> &str {
        &self.attribute
    }

    fn apply(&self, graph: &mut AnalyticsGraph) -> Result<(), AnalysisError> {
        let scores = ExternalScores::new(graph, self.scores.clone()).all_scores()?;
        write_scores(graph, &self.attribute, scores, Attribute::double);
        Ok(())
    }
}

/// An ordered sequence of passes.
#[derive(Default)]
pub struct AnalysisPipeline {
    passes: Vec<Box<dyn GraphAnalysis>>,
}

impl AnalysisPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in passes in dependency order: basic metrics, network
    /// expansion, height.
    pub fn standard() -> Self {
        Self::new()
            .with_pass(BasicMetrics)
            .with_pass(NetworkExpansion)
            .with_pass(VertexHeightAnalysis)
    }

    /// Append a pass.
    pub fn with_pass(mut self, pass: impl GraphAnalysis + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Whether the pipeline has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Run every pass in order, stopping at the first failure.
    pub fn run(&self, graph: &mut AnalyticsGraph) -> Result<(), AnalysisError> {
        for pass in &self.passes {
            let span = info_span!("analysis", pass = pass.name());
            let _guard = span.enter();
            pass.apply(graph)?;
            info!(vertices = graph.vertex_count(), "analysis pass complete");
        }
        Ok(())
    }
}

impl std::fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.passes.iter().map(|p| p.name()).collect();
        f.debug_struct("AnalysisPipeline").field("passes", &names).finish()
    }
}
