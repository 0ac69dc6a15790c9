//! Vertex height: number of breadth-first levels below a vertex.

use std::collections::BTreeSet;

use super::{ScoreCache, ScoringError, VertexScorer};
use crate::graph::AnalyticsGraph;
use crate::types::VertexId;

/// Height of a vertex along its outgoing edges.
///
/// ## Algorithm
///
/// 1. Start with a frontier holding only the vertex; height = 0
/// 2. While the frontier is non-empty: height += 1, then for each frontier
///    vertex mark it processed and queue every outgoing target that is not
///    the vertex itself and has not been processed yet
/// 3. The queued targets (deduplicated) form the next frontier
///
/// A vertex is expanded once per level it is queued at, and only while it
/// has not been processed. Within a level, frontier vertices are processed in
/// path order, so an edge into a vertex processed earlier in the same level
/// is not followed. The result is therefore not always the longest path:
/// with `A -> B`, `A -> C` and `C -> B`, the height of `A` is 2. Isolated
/// vertices (and vertices with only self-edges) have height 1.
#[derive(Debug)]
pub struct VertexHeight<'g> {
    graph: &'g AnalyticsGraph,
    cache: ScoreCache<usize>,
}

impl<'g> VertexHeight<'g> {
    /// Bind a new scorer to `graph`.
    pub fn new(graph: &'g AnalyticsGraph) -> Self {
        Self {
            graph,
            cache: ScoreCache::new(),
        }
    }

    fn compute(graph: &AnalyticsGraph, start: &VertexId) -> usize {
        let mut processed: BTreeSet<&VertexId> = BTreeSet::new();
        let mut frontier: Vec<&VertexId> = vec![start];
        let mut height = 0;

        while !frontier.is_empty() {
            height += 1;
            let mut next: Vec<&VertexId> = Vec::new();
            let mut queued: BTreeSet<&VertexId> = BTreeSet::new();

            for vertex in frontier {
                processed.insert(vertex);
                for target in graph.successors(vertex) {
                    if target != vertex && !processed.contains(target) && queued.insert(target) {
                        next.push(target);
                    }
                }
            }
            frontier = next;
        }
        height
    }
}

impl<'g> VertexScorer<'g> for VertexHeight<'g> {
    type Score = usize;

    fn graph(&self) -> &'g AnalyticsGraph {
        self.graph
    }

    fn score(&mut self, vertex: &VertexId) -> Result<usize, ScoringError> {
        let graph = self.graph;
        self.cache
            .get_or_compute(graph, vertex, || Self::compute(graph, vertex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EdgeInfo, VertexInfo};

    fn make_graph(paths: &[&str], edges: &[(&str, &str)]) -> AnalyticsGraph {
        let mut graph = AnalyticsGraph::new();
        for path in paths {
            graph.add_vertex(VertexInfo::new(*path));
        }
        for (source, target) in edges {
            graph.add_edge(EdgeInfo::new(*source, *target)).unwrap();
        }
        graph
    }

    fn height_of(graph: &AnalyticsGraph, path: &str) -> usize {
        VertexHeight::new(graph).score(&VertexId::new(path)).unwrap()
    }

    #[test]
    fn test_chain_heights() {
        let graph = make_graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        assert_eq!(height_of(&graph, "A"), 3);
        assert_eq!(height_of(&graph, "B"), 2);
        assert_eq!(height_of(&graph, "C"), 1);
    }

    #[test]
    fn test_isolated_and_self_loop_height_one() {
        let graph = make_graph(&["A", "B"], &[("B", "B")]);
        assert_eq!(height_of(&graph, "A"), 1);
        assert_eq!(height_of(&graph, "B"), 1);
    }

    #[test]
    fn test_shortcut_into_later_frontier_vertex_is_followed() {
        // B is processed before C in level two, so B -> C extends to level three.
        let graph = make_graph(&["A", "B", "C"], &[("A", "B"), ("A", "C"), ("B", "C")]);
        assert_eq!(height_of(&graph, "A"), 3);
    }

    #[test]
    fn test_shortcut_into_earlier_frontier_vertex_is_not_followed() {
        // B is already processed when C is expanded, so C -> B adds no level.
        let graph = make_graph(&["A", "B", "C"], &[("A", "B"), ("A", "C"), ("C", "B")]);
        assert_eq!(height_of(&graph, "A"), 2);
    }

    #[test]
    fn test_incoming_edges_do_not_count() {
        let graph = make_graph(&["A", "B"], &[("B", "A")]);
        assert_eq!(height_of(&graph, "A"), 1);
    }

    #[test]
    fn test_cycle_terminates() {
        let graph = make_graph(&["A", "B"], &[("A", "B"), ("B", "A")]);
        assert_eq!(height_of(&graph, "A"), 2);
    }

    #[test]
    fn test_unknown_vertex_is_an_error() {
        let graph = make_graph(&["A"], &[]);
        let mut scorer = VertexHeight::new(&graph);
        assert!(matches!(
            scorer.score(&VertexId::new("nope")),
            Err(ScoringError::UnknownVertex(_))
        ));
    }
}
