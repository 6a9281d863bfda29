//! Translation of store queries into PostgreSQL JSONB predicates.
//!
//! Collection names and field paths are restricted to `[A-Za-z0-9_]` so they
//! can be spliced into DDL; every filter value is bound as a parameter.

use sqlx::{Postgres, QueryBuilder};

use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::types::{FilterField, FilterOp, FilterValue, SortField};

/// Prefix for collection tables.
const TABLE_PREFIX: &str = "doc_";

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The table backing a collection.
pub fn table_name(collection: &str) -> AppResult<String> {
    if !is_identifier(collection) {
        return Err(AppError::validation(format!(
            "Invalid collection name '{collection}'"
        )));
    }
    Ok(format!("{TABLE_PREFIX}{}", collection.to_ascii_lowercase()))
}

/// Split and check a dotted field path.
pub fn path_segments(field: &str) -> AppResult<Vec<String>> {
    let segments: Vec<String> = field.split('.').map(str::to_string).collect();
    if segments.iter().all(|s| is_identifier(s)) {
        Ok(segments)
    } else {
        Err(AppError::validation(format!("Invalid field path '{field}'")))
    }
}

/// `CREATE TABLE` statement for a collection.
pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} ( \
            id TEXT PRIMARY KEY, \
            doc JSONB NOT NULL, \
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW() \
         )"
    )
}

/// `CREATE INDEX` statement for an expression index on a field path.
pub fn create_index_sql(table: &str, segments: &[String]) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {table}_{}_idx ON {table} ((doc #>> '{{{}}}'))",
        segments.join("_").to_ascii_lowercase(),
        segments.join(",")
    )
}

fn comparison(op: FilterOp) -> Option<&'static str> {
    match op {
        FilterOp::Eq => Some(" = "),
        FilterOp::Ne => Some(" IS DISTINCT FROM "),
        FilterOp::Gt => Some(" > "),
        FilterOp::Gte => Some(" >= "),
        FilterOp::Lt => Some(" < "),
        FilterOp::Lte => Some(" <= "),
        _ => None,
    }
}

fn push_text(builder: &mut QueryBuilder<'_, Postgres>, path: &[String]) {
    builder.push("(doc #>> ");
    builder.push_bind(path.to_vec());
    builder.push(")");
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &FilterField) -> AppResult<()> {
    let path = path_segments(&filter.field)?;

    match (filter.op, &filter.value) {
        (FilterOp::IsNull, _) => {
            push_text(builder, &path);
            builder.push(" IS NULL");
        }
        (FilterOp::IsNotNull, _) => {
            push_text(builder, &path);
            builder.push(" IS NOT NULL");
        }
        (FilterOp::In, FilterValue::StringList(list)) => {
            push_text(builder, &path);
            builder.push(" = ANY(");
            builder.push_bind(list.clone());
            builder.push(")");
        }
        (FilterOp::Contains, FilterValue::String(needle)) => {
            builder.push("((jsonb_typeof(doc #> ");
            builder.push_bind(path.clone());
            builder.push(") = 'string' AND ");
            push_text(builder, &path);
            builder.push(" ILIKE ");
            builder.push_bind(format!("%{}%", escape_like(needle)));
            builder.push(
                ") OR EXISTS (SELECT 1 FROM jsonb_array_elements_text(\
                 CASE WHEN jsonb_typeof(doc #> ",
            );
            builder.push_bind(path.clone());
            builder.push(") = 'array' THEN doc #> ");
            builder.push_bind(path);
            builder.push(" ELSE '[]'::jsonb END) AS e(v) WHERE lower(e.v) = lower(");
            builder.push_bind(needle.clone());
            builder.push(")))");
        }
        (op, value) => {
            let Some(cmp) = comparison(op) else {
                return Err(AppError::validation(format!(
                    "Unsupported filter {op:?} on '{}'",
                    filter.field
                )));
            };
            match value {
                FilterValue::String(s) => {
                    push_text(builder, &path);
                    builder.push(cmp);
                    builder.push_bind(s.clone());
                }
                FilterValue::Integer(i) => {
                    push_text(builder, &path);
                    builder.push("::double precision");
                    builder.push(cmp);
                    builder.push_bind(*i as f64);
                }
                FilterValue::Float(f) => {
                    push_text(builder, &path);
                    builder.push("::double precision");
                    builder.push(cmp);
                    builder.push_bind(*f);
                }
                FilterValue::Boolean(b) => {
                    push_text(builder, &path);
                    builder.push("::boolean");
                    builder.push(cmp);
                    builder.push_bind(*b);
                }
                FilterValue::StringList(_) | FilterValue::Null => {
                    return Err(AppError::validation(format!(
                        "Filter {op:?} on '{}' needs a scalar value",
                        filter.field
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Append ` WHERE ...` for the given filters (nothing when empty).
pub fn push_where(
    builder: &mut QueryBuilder<'_, Postgres>,
    filters: &[FilterField],
) -> AppResult<()> {
    for (i, filter) in filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_filter(builder, filter)?;
    }
    Ok(())
}

/// Append ` ORDER BY ...`, always ending with `id ASC`.
///
/// RFC 3339 timestamp strings are ordered by their epoch value. JSON
/// `null` is folded into SQL `NULL` so it places like a missing field.
pub fn push_order_by(builder: &mut QueryBuilder<'_, Postgres>, sort: &[SortField]) -> AppResult<()> {
    builder.push(" ORDER BY ");
    for key in sort {
        let path = path_segments(&key.field)?;
        builder.push("CASE WHEN jsonb_typeof(doc #> ");
        builder.push_bind(path.clone());
        builder.push(") = 'string' AND ");
        push_text(builder, &path);
        builder.push(" ~ '^[0-9]{4}-[0-9]{2}-[0-9]{2}T' THEN to_jsonb(extract(epoch FROM ");
        push_text(builder, &path);
        builder.push("::timestamptz)) ELSE NULLIF(doc #> ");
        builder.push_bind(path);
        builder.push(", 'null'::jsonb) END ");
        builder.push(key.direction.as_sql());
        builder.push(", ");
    }
    builder.push("id ASC");
    Ok(())
}
