//! Document store trait for pluggable persistence backends.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::filter::FilterField;
use crate::types::pagination::{PageRequest, PageResponse};
use crate::types::sorting::SortField;

/// Query parameters for [`DocumentStore::find`].
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    /// All filters must match (logical AND).
    pub filters: Vec<FilterField>,
    /// Sort keys, applied in order. Ties fall back to document id.
    pub sort: Vec<SortField>,
    /// Page to return.
    pub page: PageRequest,
}

impl FindQuery {
    /// A query matching every document in a collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a filter.
    pub fn filter(mut self, filter: FilterField) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a sort key.
    pub fn sort(mut self, sort: SortField) -> Self {
        self.sort.push(sort);
        self
    }

    /// Set the page.
    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}

/// Trait for document-oriented stores (in-memory or PostgreSQL JSONB).
///
/// Documents are JSON objects addressed by a string id inside a named
/// collection. A single `replace` call is atomic with respect to other
/// writers of the same document; there are no cross-document transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new document. Fails with a validation error if the id is taken.
    async fn create(&self, collection: &str, id: &str, doc: Value) -> AppResult<Value>;

    /// Fetch a document by id.
    async fn find_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    /// Fetch a filtered, sorted page of documents.
    async fn find(&self, collection: &str, query: &FindQuery) -> AppResult<PageResponse<Value>>;

    /// Count documents matching every filter.
    async fn count(&self, collection: &str, filters: &[FilterField]) -> AppResult<u64>;

    /// Atomically replace an existing document. Fails with not-found if absent.
    async fn replace(&self, collection: &str, id: &str, doc: Value) -> AppResult<Value>;

    /// Delete a document by id. Returns `true` if it existed.
    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool>;

    /// Delete every document matching all filters. Returns the number removed.
    async fn delete_many(&self, collection: &str, filters: &[FilterField]) -> AppResult<u64>;

    /// Declare a secondary index on a dotted field path.
    async fn declare_index(&self, collection: &str, field: &str) -> AppResult<()>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
