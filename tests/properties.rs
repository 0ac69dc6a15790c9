//! Property tests over randomly generated graphs.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use proptest::prelude::*;

use graph_analytics::validation::matcher::{
    all_of, any_of, boolean_attribute, edge_target, equal_to, greater_than, has_outgoing_edge,
    less_than, not, numeric_attribute, path,
};
use graph_analytics::{
    compare_graphs, AnalyticsGraph, Attribute, EdgeInfo, Matcher, ReachableNodes,
    TraversalDirection, VertexHeight, VertexInfo, VertexScorer,
};

// ─────────────────────────────────────────────────────────────────────────────
// Strategies
// ─────────────────────────────────────────────────────────────────────────────

fn vertex_path(index: usize) -> String {
    format!(":m{}", index)
}

fn make_graph(vertices: BTreeMap<usize, BTreeMap<String, i32>>, edges: Vec<(usize, usize, i32)>) -> AnalyticsGraph {
    let mut graph = AnalyticsGraph::new();
    for (index, attributes) in &vertices {
        let mut vertex = VertexInfo::new(vertex_path(*index));
        for (name, value) in attributes {
            vertex.set_attribute(name.clone(), Attribute::int(*value));
        }
        graph.add_vertex(vertex);
    }
    for (source, target, weight) in edges {
        if vertices.contains_key(&source) && vertices.contains_key(&target) {
            let edge = EdgeInfo::new(vertex_path(source), vertex_path(target))
                .with_attribute("weight", Attribute::int(weight));
            graph.add_edge(edge).unwrap();
        }
    }
    graph
}

fn arb_graph() -> impl Strategy<Value = AnalyticsGraph> {
    (
        prop::collection::btree_map(
            0usize..8,
            prop::collection::btree_map("[a-c]", 0i32..100, 0..3),
            1..8,
        ),
        prop::collection::vec((0usize..8, 0usize..8, 0i32..10), 0..16),
    )
        .prop_map(|(vertices, edges)| make_graph(vertices, edges))
}

fn arb_matcher() -> impl Strategy<Value = Matcher> {
    prop_oneof![
        (0i32..100).prop_map(|n| numeric_attribute("a", greater_than(n))),
        (0i32..100).prop_map(|n| numeric_attribute("b", less_than(n))),
        (0usize..8).prop_map(|i| path(equal_to(vertex_path(i)))),
        (0usize..8).prop_map(|i| has_outgoing_edge(edge_target(path(equal_to(vertex_path(i)))))),
        Just(boolean_attribute("c", equal_to(true))),
        Just(all_of(vec![])),
        Just(any_of(vec![])),
    ]
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn test_merge_is_idempotent(a in arb_graph(), b in arb_graph()) {
        let mut once = a.clone();
        once.merge(&b).unwrap();
        let mut twice = once.clone();
        twice.merge(&b).unwrap();

        prop_assert_eq!(once.fingerprint().unwrap(), twice.fingerprint().unwrap());
    }

    #[test]
    fn test_merge_unions_disjoint_attributes(x in 0i32..100, y in 0i32..100) {
        let mut left = AnalyticsGraph::new();
        left.add_vertex(VertexInfo::new(":app").with_attribute("x", Attribute::int(x)));
        let mut right = AnalyticsGraph::new();
        right.add_vertex(VertexInfo::new(":app").with_attribute("y", Attribute::int(y)));

        left.merge(&right).unwrap();
        let vertex = left.find_vertex(":app").unwrap();
        prop_assert_eq!(left.vertex_count(), 1);
        prop_assert_eq!(&vertex.attributes["x"], &Attribute::int(x));
        prop_assert_eq!(&vertex.attributes["y"], &Attribute::int(y));
    }

    #[test]
    fn test_vertex_equality_is_identity_only(x in any::<i32>(), y in any::<i32>()) {
        let left = VertexInfo::new(":app").with_attribute("x", Attribute::int(x));
        let right = VertexInfo::new(":app").with_attribute("y", Attribute::int(y));

        prop_assert_eq!(&left, &right);
        prop_assert_eq!(hash_of(&left), hash_of(&right));
    }

    #[test]
    fn test_reachability_counts_self(graph in arb_graph()) {
        for direction in [TraversalDirection::Incoming, TraversalDirection::Outgoing] {
            let scores = ReachableNodes::new(&graph, direction).all_scores().unwrap();
            for score in scores.values() {
                prop_assert!(*score >= 1);
                prop_assert!(*score <= graph.vertex_count());
            }
        }
        let heights = VertexHeight::new(&graph).all_scores().unwrap();
        prop_assert!(heights.values().all(|h| *h >= 1));
    }

    #[test]
    fn test_edgeless_scores_are_one(count in 1usize..10) {
        let graph = make_graph((0..count).map(|i| (i, BTreeMap::new())).collect(), vec![]);
        for direction in [TraversalDirection::Incoming, TraversalDirection::Outgoing] {
            let scores = ReachableNodes::new(&graph, direction).all_scores().unwrap();
            prop_assert!(scores.values().all(|s| *s == 1));
        }
        let heights = VertexHeight::new(&graph).all_scores().unwrap();
        prop_assert!(heights.values().all(|h| *h == 1));
    }

    #[test]
    fn test_double_negation(graph in arb_graph(), matcher in arb_matcher()) {
        let doubled = not(not(matcher.clone()));
        for vertex in graph.vertices() {
            prop_assert_eq!(
                doubled.matches_vertex(&graph, vertex).matched,
                matcher.matches_vertex(&graph, vertex).matched
            );
        }
    }

    #[test]
    fn test_self_comparison_has_no_deltas(graph in arb_graph()) {
        let report = compare_graphs(&graph, &graph);
        prop_assert_eq!(report.deltas().count(), 0);
        prop_assert!(report.render().ends_with("Deltas by project:\n"));
    }
}

#[test]
fn test_empty_combinators() {
    let graph = make_graph(BTreeMap::from([(0, BTreeMap::new())]), vec![]);
    let vertex = graph.find_vertex(":m0").unwrap();
    assert!(all_of(vec![]).matches_vertex(&graph, vertex).matched);
    assert!(!any_of(vec![]).matches_vertex(&graph, vertex).matched);
}
