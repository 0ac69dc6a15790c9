//! Vertex types: module identity plus a mutable attribute bag.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::attribute::Attribute;
use super::Attributed;

/// Stable identity of a vertex (the module path, e.g. `:app:core`).
///
/// Implements `Ord` for deterministic ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(String);

impl VertexId {
    /// Create a new VertexId from a module path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Get the module path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VertexId {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for VertexId {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl AsRef<str> for VertexId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A module vertex.
///
/// Equality and hashing consider only `path`: two records for the same module
/// are the same vertex no matter which attributes each one carries. The path
/// is fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexInfo {
    path: VertexId,
    /// Named, typed attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
}

impl VertexInfo {
    /// Create a vertex with no attributes.
    pub fn new(path: impl Into<VertexId>) -> Self {
        Self {
            path: path.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Identity key.
    pub fn path(&self) -> &VertexId {
        &self.path
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

    /// Human-readable attribute list: `(a=1, b=2)`.
    pub fn attribute_summary(&self) -> String {
        attribute_summary(&self.attributes)
    }
}

impl PartialEq for VertexInfo {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for VertexInfo {}

impl Hash for VertexInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl Attributed for VertexInfo {
    fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.attributes
    }
}

impl fmt::Display for VertexInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Render an attribute map as `(name=value, ...)`.
pub(crate) fn attribute_summary(attributes: &BTreeMap<String, Attribute>) -> String {
    let parts: Vec<String> = attributes
        .iter()
        .map(|(name, attr)| format!("{}={}", name, attr.value))
        .collect();
    format!("({})", parts.join(", "))
}
