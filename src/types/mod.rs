//! Core types for the analytics graph.

pub mod attribute;
pub mod edge;
pub mod vertex;

use std::collections::BTreeMap;

pub use attribute::{Attribute, AttributeType, Number};
pub use edge::EdgeInfo;
pub use vertex::{VertexId, VertexInfo};

/// Anything carrying a named, typed attribute bag.
pub trait Attributed {
    /// All attributes, ordered by name.
    fn attributes(&self) -> &BTreeMap<String, Attribute>;

    /// Look up a single attribute.
    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().get(name)
    }
}
