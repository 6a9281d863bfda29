//! In-memory document store implementation using dashmap.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use tracing::debug;

use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::traits::store::{DocumentStore, FindQuery};
use scripthub_core::types::{FilterField, PageResponse};

use super::query;

type Collection = Arc<DashMap<String, Value>>;

/// In-memory document store.
///
/// Each collection is its own concurrent map, so a `replace` holds only
/// the shard lock of the document it writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    /// Collections by name.
    collections: Arc<DashMap<String, Collection>>,
    /// Declared index paths by collection.
    indexes: Arc<DashMap<String, BTreeSet<String>>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, name: &str) -> Collection {
        // Clone the Arc out so the outer shard guard is released immediately.
        self.collections
            .entry(name.to_string())
            .or_default()
            .value()
            .clone()
    }

    fn matching(&self, name: &str, filters: &[FilterField]) -> Vec<Value> {
        self.collection(name)
            .iter()
            .filter(|entry| query::matches_all(entry.value(), filters))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Index paths declared on a collection, in sorted order.
    pub fn indexes(&self, collection: &str) -> Vec<String> {
        self.indexes
            .get(collection)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(&self, collection: &str, id: &str, doc: Value) -> AppResult<Value> {
        match self.collection(collection).entry(id.to_string()) {
            Entry::Occupied(_) => Err(AppError::validation(format!(
                "Document '{id}' already exists in '{collection}'"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(doc.clone());
                debug!(collection, id, "Document created");
                Ok(doc)
            }
        }
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        Ok(self
            .collection(collection)
            .get(id)
            .map(|entry| entry.value().clone()))
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> AppResult<PageResponse<Value>> {
        let mut docs = self.matching(collection, &query.filters);
        docs.sort_by(|a, b| query::sort_order(a, b, &query.sort));

        let total = docs.len() as u64;
        let items = docs
            .into_iter()
            .skip(usize::try_from(query.page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.page.limit()).unwrap_or(usize::MAX))
            .collect();

        Ok(PageResponse::new(
            items,
            query.page.page,
            query.page.page_size,
            total,
        ))
    }

    async fn count(&self, collection: &str, filters: &[FilterField]) -> AppResult<u64> {
        Ok(self
            .collection(collection)
            .iter()
            .filter(|entry| query::matches_all(entry.value(), filters))
            .count() as u64)
    }

    async fn replace(&self, collection: &str, id: &str, doc: Value) -> AppResult<Value> {
        let docs = self.collection(collection);
        let mut entry = docs.get_mut(id).ok_or_else(|| {
            AppError::not_found(format!("Document '{id}' not found in '{collection}'"))
        })?;
        *entry.value_mut() = doc.clone();
        debug!(collection, id, "Document replaced");
        Ok(doc)
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        Ok(self.collection(collection).remove(id).is_some())
    }

    async fn delete_many(&self, collection: &str, filters: &[FilterField]) -> AppResult<u64> {
        let docs = self.collection(collection);
        let doomed: Vec<String> = docs
            .iter()
            .filter(|entry| query::matches_all(entry.value(), filters))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0u64;
        for id in doomed {
            if docs.remove(&id).is_some() {
                removed += 1;
            }
        }

        debug!(collection, removed, "Deleted matching documents");
        Ok(removed)
    }

    async fn declare_index(&self, collection: &str, field: &str) -> AppResult<()> {
        self.indexes
            .entry(collection.to_string())
            .or_default()
            .insert(field.to_string());
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scripthub_core::error::ErrorKind;
    use scripthub_core::types::{PageRequest, SortField};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryDocumentStore::new();
        store
            .create("projects", "p1", json!({ "id": "p1", "title": "Vlogs" }))
            .await
            .unwrap();

        let found = store.find_by_id("projects", "p1").await.unwrap();
        assert_eq!(found.unwrap()["title"], "Vlogs");
        assert!(store.find_by_id("projects", "p2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_rejected() {
        let store = MemoryDocumentStore::new();
        store.create("c", "x", json!({ "id": "x" })).await.unwrap();
        let err = store.create("c", "x", json!({ "id": "x" })).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_replace_missing_is_not_found() {
        let store = MemoryDocumentStore::new();
        let err = store.replace("c", "ghost", json!({})).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_find_filters_sorts_and_pages() {
        let store = MemoryDocumentStore::new();
        for (id, owner, rank) in [("a", "u1", 3), ("b", "u1", 1), ("c", "u2", 2), ("d", "u1", 2)] {
            store
                .create("c", id, json!({ "id": id, "ownerId": owner, "rank": rank }))
                .await
                .unwrap();
        }

        let query = FindQuery::all()
            .filter(FilterField::eq("ownerId", "u1"))
            .sort(SortField::asc("rank"))
            .page(PageRequest::new(1, 2));
        let page = store.find("c", &query).await.unwrap();

        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
        let ids: Vec<_> = page.items.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "d"]);
    }

    #[tokio::test]
    async fn test_find_past_last_page_is_empty() {
        let store = MemoryDocumentStore::new();
        store.create("c", "a", json!({ "id": "a" })).await.unwrap();

        let query = FindQuery::all().page(PageRequest::new(u64::MAX, 100));
        let page = store.find("c", &query).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 1);
    }

    #[tokio::test]
    async fn test_delete_many() {
        let store = MemoryDocumentStore::new();
        for (id, folder) in [("s1", "f1"), ("s2", "f1"), ("s3", "f2")] {
            store
                .create("scripts", id, json!({ "id": id, "folderId": folder }))
                .await
                .unwrap();
        }

        let removed = store
            .delete_many("scripts", &[FilterField::eq("folderId", "f1")])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count("scripts", &[]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_declare_index_records_path() {
        let store = MemoryDocumentStore::new();
        store.declare_index("scripts", "projectId").await.unwrap();
        store.declare_index("scripts", "folderId").await.unwrap();
        store.declare_index("scripts", "folderId").await.unwrap();
        assert_eq!(store.indexes("scripts"), vec!["folderId", "projectId"]);
    }
}
