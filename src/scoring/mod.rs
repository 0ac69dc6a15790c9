//! Per-vertex scoring algorithms.
//!
//! A scorer is bound to one borrowed graph and memoises every score it
//! computes. Because it holds a shared borrow, the graph cannot be
//! structurally mutated while a scorer (and its cached scores) is alive;
//! build a fresh scorer after mutating.

mod external;
mod height;
mod reachable;

pub use external::ExternalScores;
pub use height::VertexHeight;
pub use reachable::{ReachableNodes, TraversalDirection};

use std::collections::BTreeMap;

use crate::graph::AnalyticsGraph;
use crate::types::VertexId;

/// Errors raised by scorers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    /// The vertex is not part of the bound graph.
    #[error("cannot return score of unknown vertex: {0}")]
    UnknownVertex(VertexId),

    /// The external collaborator supplied no score for a known vertex.
    #[error("no external score supplied for vertex: {0}")]
    MissingScore(VertexId),
}

/// A memoising per-vertex scoring algorithm bound to one graph.
pub trait VertexScorer<'g> {
    /// Score type.
    type Score: Clone;

    /// The graph this scorer is bound to.
    fn graph(&self) -> &'g AnalyticsGraph;

    /// Score a single vertex, computing it on first request.
    fn score(&mut self, vertex: &VertexId) -> Result<Self::Score, ScoringError>;

    /// Score every vertex of the bound graph.
    fn all_scores(&mut self) -> Result<BTreeMap<VertexId, Self::Score>, ScoringError> {
        let graph = self.graph();
        graph
            .vertex_ids()
            .map(|id| Ok((id.clone(), self.score(id)?)))
            .collect()
    }
}

/// Memo table shared by the built-in scorers.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScoreCache<S> {
    scores: BTreeMap<VertexId, S>,
}

impl<S: Clone> ScoreCache<S> {
    pub(crate) fn new() -> Self {
        Self {
            scores: BTreeMap::new(),
        }
    }

    /// Return the cached score, or validate membership and compute it.
    pub(crate) fn get_or_compute<F>(
        &mut self,
        graph: &AnalyticsGraph,
        vertex: &VertexId,
        compute: F,
    ) -> Result<S, ScoringError>
    where
        F: FnOnce() -> S,
    {
        if !graph.contains_vertex(vertex) {
            return Err(ScoringError::UnknownVertex(vertex.clone()));
        }
        if let Some(score) = self.scores.get(vertex) {
            return Ok(score.clone());
        }
        let score = compute();
        self.scores.insert(vertex.clone(), score.clone());
        Ok(score)
    }

    pub(crate) fn len(&self) -> usize {
        self.scores.len()
    }
}
