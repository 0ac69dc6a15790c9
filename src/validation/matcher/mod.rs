//! Composable, explainable predicates over graph values.
//!
//! A [`Matcher`] is plain data (it deserializes from rule configuration) and
//! evaluates to a [`DescribedMatch`] tree explaining every step, whether the
//! match succeeded or not.
//!
//! ## Totality
//!
//! Evaluation never fails. Missing attributes, wrong attribute types and
//! matchers applied to a value of the wrong kind all produce a non-matching
//! result whose `actual` text says what was found instead.

mod builders;
mod described;
mod value;

pub use builders::*;
pub use described::{ActualFn, DescribedMatch};
pub use value::MatchValue;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use self::value::quote_attribute;
use crate::graph::AnalyticsGraph;
use crate::types::{Attribute, Number, VertexInfo};
use crate::validation::rooted::RootedVertex;

/// Root path used when describing a matcher without a real graph.
pub const PLACEHOLDER_ROOT: &str = ":dummy";

/// Errors raised while building matchers.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// The regular expression does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern as written.
        pattern: String,
        /// Compiler error.
        source: regex_lite::Error,
    },
}

/// A regular expression that must match the whole input.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern {
    source: String,
    regex: regex_lite::Regex,
}

impl Pattern {
    /// Compile `source`, anchored at both ends.
    pub fn new(source: impl Into<String>) -> Result<Self, MatcherError> {
        let source = source.into();
        let regex = regex_lite::Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
            MatcherError::InvalidPattern {
                pattern: source.clone(),
                source: e,
            }
        })?;
        Ok(Self { source, regex })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the entire `text` matches.
    pub fn is_full_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl TryFrom<String> for Pattern {
    type Error = MatcherError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::new(source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.source
    }
}

/// A literal operand of `equal_to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Boolean literal.
    Bool(bool),
    /// Numeric literal.
    Number(Number),
    /// String literal.
    Text(String),
}

impl Literal {
    /// Quoted form used in descriptions: bare numbers, `'...'` otherwise.
    pub fn quoted(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => format!("'{}'", b),
            Self::Text(s) => format!("'{}'", s),
        }
    }

    fn equals(&self, value: &MatchValue<'_>) -> bool {
        match (self, value) {
            (Self::Text(expected), MatchValue::Text(Some(actual))) => expected == actual,
            (Self::Number(expected), MatchValue::Number(Some(actual))) => {
                expected.numerically_equals(actual)
            }
            (Self::Bool(expected), MatchValue::Bool(actual)) => expected == actual,
            _ => false,
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Number(Number::Int(value))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Number(Number::Long(value))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Number(Number::Double(value))
    }
}

/// A composable predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Matcher {
    /// Value equals a literal.
    EqualTo {
        /// Expected value.
        expected: Literal,
    },
    /// Number is present and strictly greater.
    GreaterThan {
        /// Threshold.
        expected: Number,
    },
    /// Number is present and strictly less.
    LessThan {
        /// Threshold.
        expected: Number,
    },
    /// String is present and fully matches a regular expression.
    MatchesPattern {
        /// Expression.
        pattern: Pattern,
    },
    /// Every delegate matches (vacuously true when empty).
    AllOf {
        /// Delegates, all evaluated.
        matchers: Vec<Matcher>,
    },
    /// At least one delegate matches (false when empty).
    AnyOf {
        /// Delegates, all evaluated.
        matchers: Vec<Matcher>,
    },
    /// Delegate does not match.
    Not {
        /// Inverted delegate.
        matcher: Box<Matcher>,
    },
    /// Some item of a sequence matches.
    HasItem {
        /// Per-item delegate.
        matcher: Box<Matcher>,
    },
    /// Every item of a sequence matches.
    EveryItem {
        /// Per-item delegate.
        matcher: Box<Matcher>,
    },
    /// A string attribute's value matches.
    StringAttribute {
        /// Attribute name.
        name: String,
        /// Delegate over the value.
        matcher: Box<Matcher>,
    },
    /// A numeric attribute's value matches.
    NumericAttribute {
        /// Attribute name.
        name: String,
        /// Delegate over the value.
        matcher: Box<Matcher>,
    },
    /// A boolean attribute's value matches.
    BooleanAttribute {
        /// Attribute name.
        name: String,
        /// Delegate over the value.
        matcher: Box<Matcher>,
    },
    /// A vertex's outgoing edges match.
    OutgoingEdges {
        /// Delegate over the edge list.
        matcher: Box<Matcher>,
    },
    /// An edge's source vertex matches.
    EdgeSource {
        /// Delegate over the vertex.
        matcher: Box<Matcher>,
    },
    /// An edge's target vertex matches.
    EdgeTarget {
        /// Delegate over the vertex.
        matcher: Box<Matcher>,
    },
    /// A vertex's path matches.
    Path {
        /// Delegate over the path string.
        matcher: Box<Matcher>,
    },
}

#[derive(Debug, Clone, Copy)]
enum AttributeView {
    Text,
    Numeric,
    Boolean,
}

impl AttributeView {
    fn label(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
        }
    }

    fn extract<'g>(self, attribute: Option<&Attribute>) -> MatchValue<'g> {
        match self {
            Self::Text => MatchValue::Text(attribute.map(|a| a.value.clone())),
            Self::Numeric => MatchValue::Number(attribute.and_then(Attribute::as_number)),
            Self::Boolean => MatchValue::Bool(attribute.map_or(false, Attribute::as_bool)),
        }
    }

    fn describe_actual(self, name: &str, attribute: Option<&Attribute>) -> String {
        match (self, attribute) {
            (Self::Numeric, None) => format!("no '{}' attribute found", name),
            (_, None) => format!("'{}' attribute not found", name),
            (Self::Numeric, Some(attr)) if attr.attr_type.is_numeric() => match attr.as_number() {
                Some(n) => n.to_string(),
                None => format!("{} attribute with value '{}'", attr.attr_type, attr.value),
            },
            (_, Some(attr)) => format!("{} attribute with value '{}'", attr.attr_type, attr.value),
        }
    }
}

impl Matcher {
    /// Evaluate against `value`.
    pub fn matches<'g>(&self, value: &MatchValue<'g>) -> DescribedMatch<'g> {
        match self {
            Self::EqualTo { expected } => {
                let description = value.summarized(&format!("equal to {}", expected.quoted()));
                let actual = value.clone();
                DescribedMatch::leaf(move || actual.quoted(), description, expected.equals(value))
            }
            Self::GreaterThan { expected } => {
                Self::compare(value, "greater than", expected, |a, b| a > b)
            }
            Self::LessThan { expected } => Self::compare(value, "less than", expected, |a, b| a < b),
            Self::MatchesPattern { pattern } => {
                let description = format!("matches pattern '{}'", pattern.as_str());
                match value {
                    MatchValue::Text(text) => {
                        let matched = text.as_deref().map_or(false, |t| pattern.is_full_match(t));
                        let actual = value.clone();
                        DescribedMatch::leaf(move || actual.to_string(), description, matched)
                    }
                    other => out_of_domain(description, other, "string"),
                }
            }
            Self::AllOf { matchers } => {
                let results: Vec<_> = matchers.iter().map(|m| m.matches(value)).collect();
                let matched = results.iter().all(|r| r.matched);
                let actual = value.clone();
                DescribedMatch::composite(
                    move || actual.to_string(),
                    value.summarized("all of"),
                    matched,
                    results,
                )
            }
            Self::AnyOf { matchers } => {
                let results: Vec<_> = matchers.iter().map(|m| m.matches(value)).collect();
                let matched = results.iter().any(|r| r.matched);
                let actual = value.clone();
                DescribedMatch::composite(
                    move || actual.to_string(),
                    value.summarized("any of"),
                    matched,
                    results,
                )
            }
            Self::Not { matcher } => {
                let inner = matcher.matches(value);
                let actual = value.clone();
                DescribedMatch::composite(
                    move || actual.to_string(),
                    value.summarized("not"),
                    !inner.matched,
                    vec![inner],
                )
                .inverted()
            }
            Self::HasItem { matcher } => Self::quantify(value, matcher, "any item", false),
            Self::EveryItem { matcher } => Self::quantify(value, matcher, "every item", true),
            Self::StringAttribute { name, matcher } => {
                Self::attribute(value, name, matcher, AttributeView::Text)
            }
            Self::NumericAttribute { name, matcher } => {
                Self::attribute(value, name, matcher, AttributeView::Numeric)
            }
            Self::BooleanAttribute { name, matcher } => {
                Self::attribute(value, name, matcher, AttributeView::Boolean)
            }
            Self::OutgoingEdges { matcher } => {
                let description = value.summarized("outgoing edges");
                match value {
                    MatchValue::Vertex(vertex) => {
                        let inner = matcher.matches(&MatchValue::Edges(vertex.outgoing_edges()));
                        let vertex = *vertex;
                        DescribedMatch::composite(
                            move || vertex.to_string(),
                            description,
                            inner.matched,
                            vec![inner],
                        )
                    }
                    other => out_of_domain(description, other, "vertex"),
                }
            }
            Self::EdgeSource { matcher } => Self::edge_endpoint(value, matcher, "source"),
            Self::EdgeTarget { matcher } => Self::edge_endpoint(value, matcher, "target"),
            Self::Path { matcher } => {
                let description = value.summarized("path");
                match value {
                    MatchValue::Vertex(vertex) => {
                        let path = vertex.vertex.path().to_string();
                        let inner = matcher.matches(&MatchValue::Text(Some(path.clone())));
                        DescribedMatch::composite(move || path.clone(), description, inner.matched, vec![inner])
                    }
                    other => out_of_domain(description, other, "vertex"),
                }
            }
        }
    }

    /// Evaluate against `vertex` as its own root.
    pub fn matches_vertex<'g>(&self, graph: &'g AnalyticsGraph, vertex: &'g VertexInfo) -> DescribedMatch<'g> {
        self.matches(&MatchValue::Vertex(RootedVertex::root(graph, vertex)))
    }

    /// Full rendering of this matcher against a placeholder graph holding a
    /// single attribute-less vertex. Stable for equal matchers, so it serves
    /// as a textual fingerprint of the rule.
    pub fn describe(&self) -> String {
        let mut graph = AnalyticsGraph::new();
        graph.add_vertex(VertexInfo::new(PLACEHOLDER_ROOT));
        match graph.find_vertex(PLACEHOLDER_ROOT) {
            Some(root) => self.matches_vertex(&graph, root).render(false, ""),
            None => String::new(),
        }
    }

    fn compare<'g>(
        value: &MatchValue<'g>,
        operator: &str,
        expected: &Number,
        holds: fn(f64, f64) -> bool,
    ) -> DescribedMatch<'g> {
        let description = value.summarized(&format!("{} {}", operator, expected));
        match value {
            MatchValue::Number(number) => {
                let matched = number.map_or(false, |n| holds(n.as_f64(), expected.as_f64()));
                let actual = value.clone();
                DescribedMatch::leaf(move || actual.quoted(), description, matched)
            }
            other => out_of_domain(description, other, "number"),
        }
    }

    fn quantify<'g>(
        value: &MatchValue<'g>,
        matcher: &Matcher,
        description: &str,
        universal: bool,
    ) -> DescribedMatch<'g> {
        match value {
            MatchValue::Edges(edges) => {
                let results: Vec<_> = edges
                    .iter()
                    .map(|edge| matcher.matches(&MatchValue::Edge(*edge)))
                    .collect();
                let matched = if universal {
                    results.iter().all(|r| r.matched)
                } else {
                    results.iter().any(|r| r.matched)
                };
                let actual = value.clone();
                DescribedMatch::composite(move || actual.to_string(), description, matched, results)
            }
            other => out_of_domain(description.to_string(), other, "edge list"),
        }
    }

    fn attribute<'g>(
        value: &MatchValue<'g>,
        name: &str,
        matcher: &Matcher,
        view: AttributeView,
    ) -> DescribedMatch<'g> {
        let Some(attributes) = value.attribute_map() else {
            let description = value.summarized(&format!(
                "attribute '{}' {} value {}",
                name,
                view.label(),
                quote_attribute(None)
            ));
            return out_of_domain(description, value, "vertex or edge");
        };

        let attribute = attributes.get(name);
        let description = value.summarized(&format!(
            "attribute '{}' {} value {}",
            name,
            view.label(),
            quote_attribute(attribute)
        ));
        let mut inner = matcher.matches(&view.extract(attribute));

        let name = name.to_string();
        let actual: ActualFn<'g> = Rc::new(move || view.describe_actual(&name, attribute));
        if !inner.matched {
            inner.actual = Rc::clone(&actual);
        }
        DescribedMatch {
            actual,
            description,
            matched: inner.matched,
            sub_results: vec![inner],
            inversion: false,
        }
    }

    fn edge_endpoint<'g>(value: &MatchValue<'g>, matcher: &Matcher, side: &str) -> DescribedMatch<'g> {
        let description = value.summarized(&format!("edge {}", side));
        let MatchValue::Edge(edge) = value else {
            return out_of_domain(description, value, "edge");
        };
        let endpoint = if side == "source" { edge.source() } else { edge.target() };
        let edge = *edge;
        match endpoint {
            Some(vertex) => {
                let inner = matcher.matches(&MatchValue::Vertex(vertex));
                DescribedMatch::composite(move || edge.to_string(), description, inner.matched, vec![inner])
            }
            None => {
                let side = side.to_string();
                DescribedMatch::leaf(
                    move || format!("{} vertex of {} not in graph", side, edge),
                    description,
                    false,
                )
            }
        }
    }
}

/// Non-matching result for a matcher applied to a value it does not handle.
fn out_of_domain<'g>(description: String, value: &MatchValue<'g>, expected: &'static str) -> DescribedMatch<'g> {
    let actual = value.clone();
    DescribedMatch::leaf(
        move || format!("{} {} where a {} was expected", actual.kind(), actual.quoted(), expected),
        description,
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EdgeInfo;

    fn make_graph() -> AnalyticsGraph {
        let mut graph = AnalyticsGraph::new();
        graph.add_vertex(
            VertexInfo::new(":app")
                .with_attribute("x", Attribute::int(10))
                .with_attribute("team", Attribute::string("core"))
                .with_attribute("legacy", Attribute::boolean(true)),
        );
        graph.add_vertex(VertexInfo::new(":lib").with_attribute("x", Attribute::int(3)));
        graph.add_vertex(VertexInfo::new(":test-utils"));
        graph
            .add_edge(EdgeInfo::new(":app", ":lib").with_attribute("scope", Attribute::string("api")))
            .unwrap();
        graph.add_edge(EdgeInfo::new(":app", ":test-utils")).unwrap();
        graph
    }

    fn eval(graph: &AnalyticsGraph, path: &str, matcher: &Matcher) -> bool {
        let vertex = graph.find_vertex(path).unwrap();
        matcher.matches_vertex(graph, vertex).matched
    }

    #[test]
    fn test_numeric_attribute_thresholds() {
        let graph = make_graph();
        let rule = numeric_attribute("x", greater_than(5));

        assert!(eval(&graph, ":app", &rule));
        assert!(!eval(&graph, ":lib", &rule));
        assert!(!eval(&graph, ":test-utils", &rule));
        assert!(eval(&graph, ":lib", &numeric_attribute("x", less_than(5))));
    }

    #[test]
    fn test_missing_numeric_attribute_explains_itself() {
        let graph = make_graph();
        let vertex = graph.find_vertex(":test-utils").unwrap();
        let result = numeric_attribute("x", greater_than(5)).matches_vertex(&graph, vertex);

        assert!(!result.matched);
        assert_eq!(result.description, "[:test-utils] attribute 'x' numeric value <null>");
        assert_eq!(result.sub_results[0].actual_text(), "no 'x' attribute found");
        assert_eq!(
            result.render(false, ""),
            "\u{2717} [:test-utils] attribute 'x' numeric value <null>:\n    \u{2717} greater than 5 (was: no 'x' attribute found)"
        );
    }

    #[test]
    fn test_wrong_attribute_type_is_not_a_number() {
        let graph = make_graph();
        let vertex = graph.find_vertex(":app").unwrap();
        let result = numeric_attribute("team", greater_than(0)).matches_vertex(&graph, vertex);

        assert!(!result.matched);
        assert_eq!(result.actual_text(), "STRING attribute with value 'core'");
    }

    #[test]
    fn test_string_and_boolean_attributes() {
        let graph = make_graph();
        assert!(eval(&graph, ":app", &string_attribute("team", equal_to("core"))));
        assert!(!eval(&graph, ":lib", &string_attribute("team", equal_to("core"))));
        assert!(eval(&graph, ":app", &boolean_attribute("legacy", equal_to(true))));
        // Absent booleans read as false.
        assert!(eval(&graph, ":lib", &boolean_attribute("legacy", equal_to(false))));
    }

    #[test]
    fn test_combinators_are_total_on_empty_lists() {
        let graph = make_graph();
        assert!(eval(&graph, ":app", &all_of(vec![])));
        assert!(!eval(&graph, ":app", &any_of(vec![])));
    }

    #[test]
    fn test_combinators_evaluate_every_delegate() {
        let graph = make_graph();
        let vertex = graph.find_vertex(":app").unwrap();
        let rule = any_of(vec![path(equal_to(":app")), path(equal_to(":other"))]);
        let result = rule.matches_vertex(&graph, vertex);

        assert!(result.matched);
        assert_eq!(result.sub_results.len(), 2);
    }

    #[test]
    fn test_double_negation() {
        let graph = make_graph();
        let inner = path(matches_pattern(":a.*").unwrap());
        for vertex in [":app", ":lib"] {
            assert_eq!(eval(&graph, vertex, &not(not(inner.clone()))), eval(&graph, vertex, &inner));
        }
    }

    #[test]
    fn test_pattern_requires_full_match() {
        let graph = make_graph();
        assert!(eval(&graph, ":test-utils", &path(matches_pattern(".*test.*").unwrap())));
        assert!(!eval(&graph, ":test-utils", &path(matches_pattern("test").unwrap())));
        assert!(matches_pattern("(").is_err());
    }

    #[test]
    fn test_structural_navigation() {
        let graph = make_graph();
        let depends_on_test_code = has_outgoing_edge(edge_target(path(matches_pattern(".*test.*").unwrap())));
        assert!(eval(&graph, ":app", &depends_on_test_code));
        assert!(!eval(&graph, ":lib", &depends_on_test_code));

        let api_edges_only_from_app = outgoing_edges(every_item(all_of(vec![
            edge_source(path(equal_to(":app"))),
            string_attribute("scope", equal_to("api")),
        ])));
        // The :app -> :test-utils edge has no scope.
        assert!(!eval(&graph, ":app", &api_edges_only_from_app));
        // No outgoing edges at all: vacuously true.
        assert!(eval(&graph, ":lib", &api_edges_only_from_app));
    }

    #[test]
    fn test_rooted_descriptions_carry_summary() {
        let graph = make_graph();
        let vertex = graph.find_vertex(":app").unwrap();
        let result = has_outgoing_edge(string_attribute("scope", equal_to("api")))
            .matches_vertex(&graph, vertex);

        let rendered = result.render(true, "");
        assert_eq!(
            rendered,
            "\u{2713} [:app] outgoing edges:\n    \u{2713} any item:\n        \u{2713} [:app -> :lib] attribute 'scope' string value 'api':\n            \u{2713} equal to 'api'"
        );
    }

    #[test]
    fn test_out_of_domain_never_panics() {
        let graph = make_graph();
        let result = greater_than(1).matches(&MatchValue::Text(Some("x".into())));
        assert!(!result.matched);
        assert!(result.actual_text().contains("string"));
        assert!(!eval(&graph, ":app", &has_item(path(equal_to(":app")))));
        assert!(!eval(&graph, ":app", &edge_source(path(equal_to(":app")))));
    }

    #[test]
    fn test_serde_round_trip_of_rule() {
        let rule = all_of(vec![
            numeric_attribute("x", greater_than(5)),
            not(path(matches_pattern(":legacy:.*").unwrap())),
        ]);
        let json = serde_json::to_string(&rule).unwrap();
        let back: Matcher = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_deserialize_from_config_json() {
        let json = r#"{
            "kind": "numeric_attribute",
            "name": "expansionFactor",
            "matcher": { "kind": "greater_than", "expected": 100 }
        }"#;
        let rule: Matcher = serde_json::from_str(json).unwrap();
        assert_eq!(rule, numeric_attribute("expansionFactor", greater_than(100)));

        let bad = r#"{ "kind": "matches_pattern", "pattern": "(" }"#;
        assert!(serde_json::from_str::<Matcher>(bad).is_err());
    }

    #[test]
    fn test_describe_is_stable() {
        let rule = numeric_attribute("x", greater_than(5));
        assert_eq!(rule.describe(), rule.describe());
        assert!(rule.describe().contains("[:dummy] attribute 'x' numeric value <null>"));
        assert_ne!(rule.describe(), numeric_attribute("x", greater_than(6)).describe());
    }
}
