//! PostgreSQL document store: one JSONB table per collection.

use async_trait::async_trait;
use dashmap::DashSet;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use scripthub_core::error::{AppError, ErrorKind};
use scripthub_core::result::AppResult;
use scripthub_core::traits::store::{DocumentStore, FindQuery};
use scripthub_core::types::{FilterField, PageResponse};

use super::sql;

/// PostgreSQL-backed document store.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    /// Tables already created during this process lifetime.
    ensured: std::sync::Arc<DashSet<String>>,
}

fn db_error(message: &str, e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::Store, format!("{message}: {e}"), e)
}

impl PgDocumentStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            ensured: Default::default(),
        }
    }

    /// Make sure the collection table exists and return its name.
    async fn ensure_collection(&self, collection: &str) -> AppResult<String> {
        let table = sql::table_name(collection)?;
        if self.ensured.contains(&table) {
            return Ok(table);
        }

        sqlx::query(&sql::create_table_sql(&table))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create collection table", e))?;

        info!(collection, table = %table, "Collection table ready");
        self.ensured.insert(table.clone());
        Ok(table)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create(&self, collection: &str, id: &str, doc: Value) -> AppResult<Value> {
        let table = self.ensure_collection(collection).await?;
        sqlx::query(&format!("INSERT INTO {table} (id, doc) VALUES ($1, $2)"))
            .bind(id)
            .bind(&doc)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::validation(format!(
                        "Document '{id}' already exists in '{collection}'"
                    ))
                }
                _ => db_error("Failed to insert document", e),
            })?;

        debug!(collection, id, "Document created");
        Ok(doc)
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let table = self.ensure_collection(collection).await?;
        sqlx::query_scalar::<_, Value>(&format!("SELECT doc FROM {table} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find document", e))
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> AppResult<PageResponse<Value>> {
        let total = self.count(collection, &query.filters).await?;
        let table = self.ensure_collection(collection).await?;

        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT doc FROM {table}"));
        sql::push_where(&mut builder, &query.filters)?;
        sql::push_order_by(&mut builder, &query.sort)?;
        builder.push(" LIMIT ");
        builder.push_bind(i64::try_from(query.page.limit()).unwrap_or(i64::MAX));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));

        let items = builder
            .build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to query documents", e))?;

        Ok(PageResponse::new(
            items,
            query.page.page,
            query.page.page_size,
            total,
        ))
    }

    async fn count(&self, collection: &str, filters: &[FilterField]) -> AppResult<u64> {
        let table = self.ensure_collection(collection).await?;
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {table}"));
        sql::push_where(&mut builder, filters)?;

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count documents", e))?;
        Ok(count as u64)
    }

    async fn replace(&self, collection: &str, id: &str, doc: Value) -> AppResult<Value> {
        let table = self.ensure_collection(collection).await?;
        sqlx::query_scalar::<_, Value>(&format!(
            "UPDATE {table} SET doc = $2, updated_at = NOW() WHERE id = $1 RETURNING doc"
        ))
        .bind(id)
        .bind(&doc)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to replace document", e))?
        .ok_or_else(|| AppError::not_found(format!("Document '{id}' not found in '{collection}'")))
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        let table = self.ensure_collection(collection).await?;
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete document", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, collection: &str, filters: &[FilterField]) -> AppResult<u64> {
        let table = self.ensure_collection(collection).await?;
        let mut builder = QueryBuilder::<Postgres>::new(format!("DELETE FROM {table}"));
        sql::push_where(&mut builder, filters)?;

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete documents", e))?;

        debug!(collection, removed = result.rows_affected(), "Deleted matching documents");
        Ok(result.rows_affected())
    }

    async fn declare_index(&self, collection: &str, field: &str) -> AppResult<()> {
        let table = self.ensure_collection(collection).await?;
        let segments = sql::path_segments(field)?;
        sqlx::query(&sql::create_index_sql(&table, &segments))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create index", e))?;

        info!(collection, field, "Index declared");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| db_error("Health check failed", e))
    }
}
