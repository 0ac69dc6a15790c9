//! Reachable-node count: size of the sub-graph visible from a vertex.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

use super::{ScoreCache, ScoringError, VertexScorer};
use crate::graph::AnalyticsGraph;
use crate::types::VertexId;

/// Which edges a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalDirection {
    /// Follow edges backwards, towards dependents.
    Incoming,
    /// Follow edges forwards, towards dependencies.
    Outgoing,
}

/// Counts the vertex itself plus every distinct vertex reachable from it in
/// one direction. Always at least 1.
#[derive(Debug)]
pub struct ReachableNodes<'g> {
    graph: &'g AnalyticsGraph,
    direction: TraversalDirection,
    cache: ScoreCache<usize>,
}

impl<'g> ReachableNodes<'g> {
    /// Bind a new scorer to `graph`.
    pub fn new(graph: &'g AnalyticsGraph, direction: TraversalDirection) -> Self {
        Self {
            graph,
            direction,
            cache: ScoreCache::new(),
        }
    }

    /// Traversal direction of this scorer.
    pub fn direction(&self) -> TraversalDirection {
        self.direction
    }

    /// Number of vertices scored so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn compute(graph: &AnalyticsGraph, direction: TraversalDirection, start: &VertexId) -> usize {
        let mut visited: BTreeSet<&VertexId> = BTreeSet::new();
        let mut queue: VecDeque<&VertexId> = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let neighbours: Vec<&VertexId> = match direction {
                TraversalDirection::Incoming => graph.predecessors(current).collect(),
                TraversalDirection::Outgoing => graph.successors(current).collect(),
            };
            for next in neighbours {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited.len()
    }
}

impl<'g> VertexScorer<'g> for ReachableNodes<'g> {
    type Score = usize;

    fn graph(&self) -> &'g AnalyticsGraph {
        self.graph
    }

    fn score(&mut self, vertex: &VertexId) -> Result<usize, ScoringError> {
        let (graph, direction) = (self.graph, self.direction);
        self.cache
            .get_or_compute(graph, vertex, || Self::compute(graph, direction, vertex))
    }
}
