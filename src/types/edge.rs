//! Dependency edge types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::attribute::Attribute;
use super::vertex::VertexId;
use super::Attributed;

/// A directed dependency `source -> target`.
///
/// Equality and hashing consider only the `(source, target)` pair, and the
/// canonical ordering is (source, target). Endpoints are fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeInfo {
    source: VertexId,
    target: VertexId,
    /// Named, typed attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
}

impl EdgeInfo {
    /// Create an edge with no attributes.
    pub fn new(source: impl Into<VertexId>, target: impl Into<VertexId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Depending module.
    pub fn source(&self) -> &VertexId {
        &self.source
    }

    /// Module depended upon.
    pub fn target(&self) -> &VertexId {
        &self.target
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: Attribute) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Set (or replace) an attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Attribute) {
        self.attributes.insert(name.into(), value);
    }

    /// The identity key of this edge.
    pub fn key(&self) -> (VertexId, VertexId) {
        (self.source.clone(), self.target.clone())
    }

    /// Whether the edge points back at its own source.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl PartialEq for EdgeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.target == other.target
    }
}

impl Eq for EdgeInfo {}

impl Hash for EdgeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.target.hash(state);
    }
}

impl PartialOrd for EdgeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeInfo {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.source.cmp(&other.source) {
            std::cmp::Ordering::Equal => self.target.cmp(&other.target),
            ord => ord,
        }
    }
}

impl Attributed for EdgeInfo {
    fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.attributes
    }
}

impl fmt::Display for EdgeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
