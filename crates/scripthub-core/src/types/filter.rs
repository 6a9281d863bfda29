//! Filter types for document queries.

use serde::{Deserialize, Serialize};

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Case-insensitive substring match on string fields.
    Contains,
    /// Membership in a list of values.
    In,
    /// Field is absent or null.
    IsNull,
    /// Field is present and not null.
    IsNotNull,
}

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// A list of string values (for the `In` operator).
    StringList(Vec<String>),
    /// No value (for `IsNull`, `IsNotNull`).
    Null,
}

impl FilterValue {
    /// Convert into the equivalent JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::from(s.as_str()),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Value::from(*f),
            Self::Boolean(b) => serde_json::Value::from(*b),
            Self::StringList(list) => serde_json::Value::from(list.clone()),
            Self::Null => serde_json::Value::Null,
        }
    }
}

/// A single filter condition on a dotted document field path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterField {
    /// The field path to filter on (e.g. `metadata.status`).
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter on a string value.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::String(value.into()))
    }

    /// Shorthand for a case-insensitive substring filter.
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Contains, FilterValue::String(needle.into()))
    }

    /// Shorthand for a list-membership filter.
    pub fn one_of(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, FilterOp::In, FilterValue::StringList(values))
    }

    /// Split the dotted field path into its segments.
    pub fn path(&self) -> impl Iterator<Item = &str> {
        self.field.split('.')
    }
}
