//! Filter evaluation and sort ordering over JSON documents.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use scripthub_core::types::{FilterField, FilterOp, FilterValue, SortField};

/// Resolve a dotted path inside a document.
pub fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Whether a document satisfies every filter.
pub fn matches_all(doc: &Value, filters: &[FilterField]) -> bool {
    filters.iter().all(|filter| matches(doc, filter))
}

/// Whether a document satisfies one filter.
pub fn matches(doc: &Value, filter: &FilterField) -> bool {
    let field = lookup(doc, &filter.field).filter(|v| !v.is_null());

    match filter.op {
        FilterOp::IsNull => field.is_none(),
        FilterOp::IsNotNull => field.is_some(),
        FilterOp::Eq => field.is_some_and(|v| compare(v, &filter.value.to_json()) == Some(Ordering::Equal)),
        FilterOp::Ne => !field.is_some_and(|v| compare(v, &filter.value.to_json()) == Some(Ordering::Equal)),
        FilterOp::Gt => ordered(field, &filter.value, |o| o == Ordering::Greater),
        FilterOp::Gte => ordered(field, &filter.value, |o| o != Ordering::Less),
        FilterOp::Lt => ordered(field, &filter.value, |o| o == Ordering::Less),
        FilterOp::Lte => ordered(field, &filter.value, |o| o != Ordering::Greater),
        FilterOp::In => match (&filter.value, field) {
            (FilterValue::StringList(list), Some(Value::String(s))) => list.contains(s),
            _ => false,
        },
        FilterOp::Contains => match (&filter.value, field) {
            (FilterValue::String(needle), Some(Value::String(s))) => {
                s.to_lowercase().contains(&needle.to_lowercase())
            }
            (FilterValue::String(needle), Some(Value::Array(items))) => items
                .iter()
                .filter_map(Value::as_str)
                .any(|item| item.eq_ignore_ascii_case(needle)),
            _ => false,
        },
    }
}

fn ordered(field: Option<&Value>, value: &FilterValue, pred: impl Fn(Ordering) -> bool) -> bool {
    field
        .and_then(|v| compare(v, &value.to_json()))
        .is_some_and(pred)
}

/// Compare two scalar JSON values of the same type.
///
/// Strings that are both RFC 3339 timestamps compare chronologically.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(tx), Some(ty)) => Some(tx.cmp(&ty)),
            _ => Some(x.cmp(y)),
        },
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    if s.len() < 20 || s.as_bytes().get(10) != Some(&b'T') {
        return None;
    }
    DateTime::parse_from_rfc3339(s).ok()
}

/// Order two documents by the given sort keys, then by `id`.
///
/// Missing or null fields sort after present ones when ascending and
/// before them when descending.
pub fn sort_order(a: &Value, b: &Value, sort: &[SortField]) -> Ordering {
    for key in sort {
        let left = lookup(a, &key.field).filter(|v| !v.is_null());
        let right = lookup(b, &key.field).filter(|v| !v.is_null());
        let ord = match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
        };
        let ord = key.direction.apply(ord);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    let left = a.get("id").and_then(Value::as_str).unwrap_or_default();
    let right = b.get("id").and_then(Value::as_str).unwrap_or_default();
    left.cmp(right)
}
