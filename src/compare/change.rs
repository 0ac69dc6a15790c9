//! A single attribute change between two graph snapshots.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::types::{Attribute, AttributeType, VertexId};

/// Direction of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// New value orders after the original.
    Increased,
    /// New value orders before the original.
    Decreased,
    /// Values compare equal.
    Unchanged,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increased => write!(f, "increased"),
            Self::Decreased => write!(f, "decreased"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// One attribute of one vertex, before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonChange {
    /// Vertex the attribute belongs to.
    pub vertex: VertexId,
    /// Attribute name.
    pub attribute: String,
    /// Type of the original attribute; decides the ordering.
    pub attr_type: AttributeType,
    /// Value before.
    pub original: String,
    /// Value after.
    pub changed: String,
}

impl ComparisonChange {
    /// Type-aware direction. Values that do not parse as `attr_type` are
    /// compared as strings.
    pub fn direction(&self) -> Direction {
        match Attribute::compare_values(self.attr_type, &self.original, &self.changed) {
            Ordering::Less => Direction::Increased,
            Ordering::Greater => Direction::Decreased,
            Ordering::Equal => Direction::Unchanged,
        }
    }

    /// Whether the value moved at all.
    pub fn is_delta(&self) -> bool {
        self.direction() != Direction::Unchanged
    }

    /// Original value as a number, for numeric types.
    pub fn original_number(&self) -> Option<f64> {
        self.as_number(&self.original)
    }

    /// Changed value as a number, for numeric types.
    pub fn changed_number(&self) -> Option<f64> {
        self.as_number(&self.changed)
    }

    fn as_number(&self, raw: &str) -> Option<f64> {
        Attribute::new(self.attr_type, raw).as_number().map(|n| n.as_f64())
    }
}

impl fmt::Display for ComparisonChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} from {} to {}",
            self.attribute,
            self.direction(),
            self.original,
            self.changed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_change(attr_type: AttributeType, original: &str, changed: &str) -> ComparisonChange {
        ComparisonChange {
            vertex: VertexId::new(":app"),
            attribute: "degree".to_string(),
            attr_type,
            original: original.to_string(),
            changed: changed.to_string(),
        }
    }

    #[test]
    fn test_direction_is_type_aware() {
        assert_eq!(make_change(AttributeType::Int, "9", "10").direction(), Direction::Increased);
        assert_eq!(make_change(AttributeType::String, "9", "10").direction(), Direction::Decreased);
        assert_eq!(make_change(AttributeType::Double, "1.5", "1.50").direction(), Direction::Unchanged);
        assert_eq!(make_change(AttributeType::Boolean, "true", "false").direction(), Direction::Decreased);
    }

    #[test]
    fn test_unparsable_falls_back_to_text() {
        let change = make_change(AttributeType::Int, "abc", "abd");
        assert_eq!(change.direction(), Direction::Increased);
        assert_eq!(change.original_number(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            make_change(AttributeType::Int, "3", "5").to_string(),
            "degree increased from 3 to 5"
        );
    }
}
