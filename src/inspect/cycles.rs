//! Deadline-bounded enumeration of dependency cycles through one vertex.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use crate::graph::AnalyticsGraph;
use crate::types::VertexId;

/// Cycles found through a root vertex.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CycleSearch {
    /// Each cycle starts and ends at the root; longest first.
    pub cycles: Vec<Vec<VertexId>>,
    /// False when the deadline cut the search short.
    pub complete: bool,
}

impl CycleSearch {
    /// How often each non-root vertex occurs across all cycles, most frequent
    /// first. Ties are ordered by path.
    pub fn frequencies(&self, root: &VertexId) -> Vec<(VertexId, usize)> {
        let mut counts: BTreeMap<&VertexId, usize> = BTreeMap::new();
        for vertex in self.cycles.iter().flatten().filter(|v| *v != root) {
            *counts.entry(vertex).or_default() += 1;
        }
        let mut ranked: Vec<(VertexId, usize)> = counts.into_iter().map(|(v, c)| (v.clone(), c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Enumerate every simple cycle that passes through `root`.
///
/// Depth-first over outgoing edges, visiting targets in path order. A target
/// equal to the root closes a cycle; other targets are only entered when not
/// already on the current path. Self-loops are not reported. The search stops
/// once `deadline` passes and the result is marked incomplete.
pub fn detect_cycles(graph: &AnalyticsGraph, root: &VertexId, deadline: Instant) -> CycleSearch {
    let mut search = Search {
        graph,
        root,
        deadline,
        path: vec![root],
        on_path: BTreeSet::from([root]),
        cycles: Vec::new(),
        timed_out: false,
    };
    if graph.contains_vertex(root) {
        search.visit(root);
    }

    let mut cycles = search.cycles;
    cycles.sort_by(|a, b| b.len().cmp(&a.len()));
    CycleSearch {
        cycles,
        complete: !search.timed_out,
    }
}

struct Search<'g> {
    graph: &'g AnalyticsGraph,
    root: &'g VertexId,
    deadline: Instant,
    path: Vec<&'g VertexId>,
    on_path: BTreeSet<&'g VertexId>,
    cycles: Vec<Vec<VertexId>>,
    timed_out: bool,
}

impl<'g> Search<'g> {
    fn visit(&mut self, current: &'g VertexId) {
        if self.timed_out || Instant::now() >= self.deadline {
            self.timed_out = true;
            return;
        }

        let graph = self.graph;
        for next in graph.successors(current) {
            if next == current {
                continue;
            }
            if next == self.root {
                let mut cycle: Vec<VertexId> = self.path.iter().map(|v| (*v).clone()).collect();
                cycle.push(next.clone());
                self.cycles.push(cycle);
            } else if !self.on_path.contains(next) {
                self.path.push(next);
                self.on_path.insert(next);
                self.visit(next);
                self.on_path.remove(next);
                self.path.pop();
            }
        }
    }
}
