//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use scripthub_core::config::store::StoreConfig;
use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::traits::store::{DocumentStore, FindQuery};
use scripthub_core::types::{FilterField, PageResponse};

/// Store manager that wraps the configured document store.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store.
    inner: Arc<dyn DocumentStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn DocumentStore> = match config.provider.as_str() {
            #[cfg(feature = "postgres")]
            "postgres" => {
                info!("Initializing PostgreSQL document store");
                let pool = crate::postgres::connect(&config.postgres).await?;
                Arc::new(crate::postgres::PgDocumentStore::new(pool))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory document store");
                Arc::new(crate::memory::MemoryDocumentStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, postgres"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn DocumentStore>) -> Self {
        Self { inner: store }
    }

    /// Get a reference to the inner store.
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.as_ref()
    }
}

#[async_trait]
impl DocumentStore for StoreManager {
    async fn create(&self, collection: &str, id: &str, doc: Value) -> AppResult<Value> {
        self.inner.create(collection, id, doc).await
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        self.inner.find_by_id(collection, id).await
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> AppResult<PageResponse<Value>> {
        self.inner.find(collection, query).await
    }

    async fn count(&self, collection: &str, filters: &[FilterField]) -> AppResult<u64> {
        self.inner.count(collection, filters).await
    }

    async fn replace(&self, collection: &str, id: &str, doc: Value) -> AppResult<Value> {
        self.inner.replace(collection, id, doc).await
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        self.inner.delete(collection, id).await
    }

    async fn delete_many(&self, collection: &str, filters: &[FilterField]) -> AppResult<u64> {
        self.inner.delete_many(collection, filters).await
    }

    async fn declare_index(&self, collection: &str, field: &str) -> AppResult<()> {
        self.inner.declare_index(collection, field).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scripthub_core::error::ErrorKind;

    #[tokio::test]
    async fn test_memory_provider_selected() {
        let manager = StoreManager::new(&StoreConfig::default()).await.unwrap();
        assert!(manager.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = StoreConfig {
            provider: "mongo".into(),
            ..Default::default()
        };
        let err = StoreManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
