//! # graph-analytics
//!
//! Analytics and explainable rule validation for module-dependency graphs.
//!
//! Each module of a multi-module project contributes a small attributed
//! graph (itself plus its direct dependencies). This crate answers:
//!
//! > Given the merged graph, does a module break any architectural rule,
//! > and if so, **why**?
//!
//! ## Core Contract
//!
//! 1. Merge per-module contributions into one deterministic graph
//! 2. Annotate vertices with derived scores (degree, reachability, height, ...)
//! 3. Evaluate declarative matcher rules and explain every result
//! 4. Compare two snapshots and inspect a single module
//!
//! ## Architecture
//!
//! ```text
//! contributed graphs → merge → AnalysisPipeline → AnalyticsGraph
//!                                                      │
//!                    ┌──────────────┬──────────────────┼─────────────┐
//!                    ▼              ▼                  ▼             ▼
//!               validation       compare            inspect        store
//!          (matchers + rules)   (before/after)   (cycles, top N)  (JSON files)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Vertices, edges and attributes iterate in sorted order
//! - Same graph content → identical fingerprint, regardless of insertion order
//! - Reports are byte-identical for identical inputs

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod canonical;
pub mod compare;
pub mod graph;
pub mod inspect;
pub mod scoring;
pub mod store;
pub mod types;
pub mod validation;

// Re-exports
pub use types::{Attribute, AttributeType, Attributed, EdgeInfo, Number, VertexId, VertexInfo};
pub use graph::{AnalyticsGraph, GraphError, GraphRelation};
pub use scoring::{
    ExternalScores, ReachableNodes, ScoringError, TraversalDirection, VertexHeight, VertexScorer,
};
pub use analysis::{
    AnalysisError, AnalysisPipeline, BasicMetrics, ExternalScoreAnalysis, GraphAnalysis,
    NetworkExpansion, VertexHeightAnalysis,
};
pub use validation::{
    validate_graph, validate_graphs, DescribedMatch, GraphValidation, MatchValue, Matcher,
    MatcherError, RootedEdge, RootedVertex, ValidationConfig, ValidationError, ValidationOutcome,
    ValidationRule, ValidationRun,
};
pub use compare::{compare_graphs, ComparisonChange, ComparisonReport, Direction};
pub use inspect::{detect_cycles, inspect, CycleSearch, InspectionError, InspectionOptions};
pub use store::{
    CacheConfig, CacheStats, GraphPersistence, JsonGraphPersistence, PersistenceError,
    SharedPersistence, JSON_FORMAT_VERSION,
};
pub use canonical::{canonical_hash, canonical_hash_hex, content_hash, to_canonical_bytes};
