//! Builder functions for writing rules in code.
//!
//! ```
//! use graph_analytics::validation::matcher::*;
//!
//! // Flag modules that depend on anything under `:legacy`.
//! let rule = has_outgoing_edge(edge_target(path(matches_pattern(":legacy:.*").unwrap())));
//! # let _ = rule;
//! ```

use super::{Literal, Matcher, MatcherError, Pattern};
use crate::types::Number;

/// Value equals `expected`.
pub fn equal_to(expected: impl Into<Literal>) -> Matcher {
    Matcher::EqualTo {
        expected: expected.into(),
    }
}

/// Number is present and greater than `expected`.
pub fn greater_than(expected: impl Into<Number>) -> Matcher {
    Matcher::GreaterThan {
        expected: expected.into(),
    }
}

/// Number is present and less than `expected`.
pub fn less_than(expected: impl Into<Number>) -> Matcher {
    Matcher::LessThan {
        expected: expected.into(),
    }
}

/// String fully matches the regular expression `pattern`.
pub fn matches_pattern(pattern: &str) -> Result<Matcher, MatcherError> {
    Ok(Matcher::MatchesPattern {
        pattern: Pattern::new(pattern)?,
    })
}

/// All delegates match.
pub fn all_of(matchers: Vec<Matcher>) -> Matcher {
    Matcher::AllOf { matchers }
}

/// Any delegate matches.
pub fn any_of(matchers: Vec<Matcher>) -> Matcher {
    Matcher::AnyOf { matchers }
}

/// Delegate does not match.
pub fn not(matcher: Matcher) -> Matcher {
    Matcher::Not {
        matcher: Box::new(matcher),
    }
}

/// Some item matches.
pub fn has_item(matcher: Matcher) -> Matcher {
    Matcher::HasItem {
        matcher: Box::new(matcher),
    }
}

/// Every item matches.
pub fn every_item(matcher: Matcher) -> Matcher {
    Matcher::EveryItem {
        matcher: Box::new(matcher),
    }
}

/// String attribute `name` matches.
pub fn string_attribute(name: impl Into<String>, matcher: Matcher) -> Matcher {
    Matcher::StringAttribute {
        name: name.into(),
        matcher: Box::new(matcher),
    }
}

/// Numeric attribute `name` matches.
pub fn numeric_attribute(name: impl Into<String>, matcher: Matcher) -> Matcher {
    Matcher::NumericAttribute {
        name: name.into(),
        matcher: Box::new(matcher),
    }
}

/// Boolean attribute `name` matches.
pub fn boolean_attribute(name: impl Into<String>, matcher: Matcher) -> Matcher {
    Matcher::BooleanAttribute {
        name: name.into(),
        matcher: Box::new(matcher),
    }
}

/// The vertex's outgoing edges match.
pub fn outgoing_edges(matcher: Matcher) -> Matcher {
    Matcher::OutgoingEdges {
        matcher: Box::new(matcher),
    }
}

/// Some outgoing edge of the vertex matches.
pub fn has_outgoing_edge(matcher: Matcher) -> Matcher {
    outgoing_edges(has_item(matcher))
}

/// The edge's source vertex matches.
pub fn edge_source(matcher: Matcher) -> Matcher {
    Matcher::EdgeSource {
        matcher: Box::new(matcher),
    }
}

/// The edge's target vertex matches.
pub fn edge_target(matcher: Matcher) -> Matcher {
    Matcher::EdgeTarget {
        matcher: Box::new(matcher),
    }
}

/// The vertex's path matches.
pub fn path(matcher: Matcher) -> Matcher {
    Matcher::Path {
        matcher: Box::new(matcher),
    }
}
