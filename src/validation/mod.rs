//! Explainable rule validation over analytics graphs.
//!
//! ## Flow
//!
//! ```text
//! ValidationConfig ──► effective rules ──► Matcher::matches(root) ──► GraphValidation
//!   (rules, overrides, ignore)                                          │
//!                                                                       ▼
//!                                                             report text + error count
//! ```

pub mod matcher;
pub mod reconcile;
pub mod report;
pub mod rooted;
pub mod rule;

pub use matcher::{DescribedMatch, Literal, MatchValue, Matcher, MatcherError, Pattern};
pub use reconcile::{validate_graph, GraphValidation, ValidationOutcome};
pub use report::{render_outcome, validate_graphs, ValidationRun};
pub use rooted::{RootedEdge, RootedVertex};
pub use rule::{ValidationConfig, ValidationRule, OVERRIDE_REASON};

/// Aggregate validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// At least one unignored violation or stale ignore was found.
    #[error("{count} graph validation error(s) detected")]
    Failed {
        /// Unignored violations plus stale ignores.
        count: usize,
        /// Full report text.
        report: String,
    },
}
