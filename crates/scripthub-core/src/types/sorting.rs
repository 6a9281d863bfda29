//! Sort keys over document field paths.
//!
//! Documents may lack a sort field. Missing values order after present
//! ones when ascending and before them when descending, in every backend.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Orient an ascending comparison.
    pub fn apply(self, ascending: Ordering) -> Ordering {
        match self {
            Self::Asc => ascending,
            Self::Desc => ascending.reverse(),
        }
    }

    /// `ORDER BY` suffix, including where missing values go.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC NULLS LAST",
            Self::Desc => "DESC NULLS FIRST",
        }
    }
}

/// One sort key: a dotted document path and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Dotted field path (e.g. `metadata.status`).
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortField {
    /// Sort ascending on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Sort descending on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_reverses_for_desc() {
        assert_eq!(SortDirection::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn test_sql_places_missing_values() {
        assert_eq!(SortDirection::Asc.as_sql(), "ASC NULLS LAST");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC NULLS FIRST");
    }

    #[test]
    fn test_direction_defaults_to_asc() {
        let key: SortField = serde_json::from_str(r#"{ "field": "title" }"#).unwrap();
        assert_eq!(key, SortField::asc("title"));
    }
}
