//! Scores supplied by an external graph-algorithm collaborator.

use std::collections::BTreeMap;

use super::{ScoringError, VertexScorer};
use crate::graph::AnalyticsGraph;
use crate::types::VertexId;

/// Adapter exposing precomputed scores (e.g. betweenness centrality from a
/// general graph library) through [`VertexScorer`].
#[derive(Debug, Clone)]
pub struct ExternalScores<'g> {
    graph: &'g AnalyticsGraph,
    scores: BTreeMap<VertexId, f64>,
}

impl<'g> ExternalScores<'g> {
    /// Wrap `scores` computed for `graph`.
    pub fn new(graph: &'g AnalyticsGraph, scores: BTreeMap<VertexId, f64>) -> Self {
        Self { graph, scores }
    }

    /// Compute scores with `algorithm`, called once per vertex.
    pub fn from_fn<F>(graph: &'g AnalyticsGraph, mut algorithm: F) -> Self
    where
        F: FnMut(&AnalyticsGraph, &VertexId) -> f64,
    {
        let scores = graph
            .vertex_ids()
            .map(|id| (id.clone(), algorithm(graph, id)))
            .collect();
        Self { graph, scores }
    }
}

impl<'g> VertexScorer<'g> for ExternalScores<'g> {
    type Score = f64;

    fn graph(&self) -> &'g AnalyticsGraph {
        self.graph
    }

    fn score(&mut self, vertex: &VertexId) -> Result<f64, ScoringError> {
        if !self.graph.contains_vertex(vertex) {
            return Err(ScoringError::UnknownVertex(vertex.clone()));
        }
        self.scores
            .get(vertex)
            .copied()
            .ok_or_else(|| ScoringError::MissingScore(vertex.clone()))
    }
}
