//! Typed, tagged attribute values.
//!
//! Attribute values are stored as text together with their type tag so they
//! survive text-based persistence unchanged. The tag is consulted whenever a
//! typed view is needed (numeric comparison, boolean tests, diffing).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Runtime type tag of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// `true` / `false`.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Free-form text.
    String,
}

impl AttributeType {
    /// All supported attribute types.
    pub const ALL: [AttributeType; 6] = [
        Self::Boolean,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::String,
    ];

    /// Whether values of this type are numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Long | Self::Float | Self::Double)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Int => write!(f, "INT"),
            Self::Long => write!(f, "LONG"),
            Self::Float => write!(f, "FLOAT"),
            Self::Double => write!(f, "DOUBLE"),
            Self::String => write!(f, "STRING"),
        }
    }
}

/// A numeric value carrying its original width.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Number {
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
}

impl Number {
    /// Widen to `f64` for comparisons.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(v) => v as f64,
            Self::Long(v) => v as f64,
            Self::Float(v) => v as f64,
            Self::Double(v) => v,
        }
    }

    /// Numeric equality regardless of width.
    pub fn numerically_equals(&self, other: &Number) -> bool {
        self.as_f64() == other.as_f64()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:?}", v),
            Self::Double(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for Number {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

/// Wire form of a [`Number`]: integers stay integral, everything else is a double.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Integer(i64),
    Real(f64),
}

impl Serialize for Number {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Int(v) => NumberRepr::Integer(v as i64).serialize(serializer),
            Self::Long(v) => NumberRepr::Integer(v).serialize(serializer),
            Self::Float(v) => NumberRepr::Real(v as f64).serialize(serializer),
            Self::Double(v) => NumberRepr::Real(v).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match NumberRepr::deserialize(deserializer)? {
            NumberRepr::Integer(v) => match i32::try_from(v) {
                Ok(small) => Self::Int(small),
                Err(_) => Self::Long(v),
            },
            NumberRepr::Real(v) => Self::Double(v),
        })
    }
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    /// Type tag.
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    /// Textual value.
    pub value: String,
}

impl Attribute {
    /// Create an attribute from a type tag and raw text.
    pub fn new(attr_type: AttributeType, value: impl Into<String>) -> Self {
        Self {
            attr_type,
            value: value.into(),
        }
    }

    /// Boolean attribute.
    pub fn boolean(value: bool) -> Self {
        Self::new(AttributeType::Boolean, value.to_string())
    }

    /// 32-bit integer attribute.
    pub fn int(value: i32) -> Self {
        Self::new(AttributeType::Int, value.to_string())
    }

    /// 64-bit integer attribute.
    pub fn long(value: i64) -> Self {
        Self::new(AttributeType::Long, value.to_string())
    }

    /// 32-bit float attribute.
    pub fn float(value: f32) -> Self {
        Self::new(AttributeType::Float, format!("{:?}", value))
    }

    /// 64-bit float attribute.
    pub fn double(value: f64) -> Self {
        Self::new(AttributeType::Double, format!("{:?}", value))
    }

    /// String attribute.
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(AttributeType::String, value)
    }

    /// Parse the value as a number according to the type tag.
    ///
    /// Returns `None` for non-numeric tags or text that does not parse.
    pub fn as_number(&self) -> Option<Number> {
        let raw = self.value.trim();
        match self.attr_type {
            AttributeType::Int => raw.parse().ok().map(Number::Int),
            AttributeType::Long => raw.parse().ok().map(Number::Long),
            AttributeType::Float => raw.parse().ok().map(Number::Float),
            AttributeType::Double => raw.parse().ok().map(Number::Double),
            AttributeType::Boolean | AttributeType::String => None,
        }
    }

    /// Boolean view of the value: `true` only for the text `true` (any case).
    pub fn as_bool(&self) -> bool {
        self.value.trim().eq_ignore_ascii_case("true")
    }

    /// Compare two raw values using the ordering of `attr_type`.
    ///
    /// Falls back to lexicographic ordering when either side does not parse.
    pub fn compare_values(attr_type: AttributeType, left: &str, right: &str) -> Ordering {
        fn typed<T: std::str::FromStr + PartialOrd>(left: &str, right: &str) -> Option<Ordering> {
            let l: T = left.trim().parse().ok()?;
            let r: T = right.trim().parse().ok()?;
            l.partial_cmp(&r)
        }

        let typed_ordering = match attr_type {
            AttributeType::Boolean => typed::<bool>(left, right),
            AttributeType::Int => typed::<i32>(left, right),
            AttributeType::Long => typed::<i64>(left, right),
            AttributeType::Float => typed::<f32>(left, right),
            AttributeType::Double => typed::<f64>(left, right),
            AttributeType::String => None,
        };
        typed_ordering.unwrap_or_else(|| left.cmp(right))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
