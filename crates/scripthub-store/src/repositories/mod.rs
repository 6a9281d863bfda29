//! Typed repositories over the document store.

pub mod project;
pub mod script;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use scripthub_core::result::AppResult;
use scripthub_core::traits::store::{DocumentStore, FindQuery};
use scripthub_core::types::PageRequest;

pub use project::ProjectRepository;
pub use script::ScriptRepository;

/// Collection holding project documents.
pub const PROJECTS: &str = "projects";
/// Collection holding script documents.
pub const SCRIPTS: &str = "scripts";

/// Declare the secondary indexes the repositories query by.
pub async fn ensure_indexes(store: &dyn DocumentStore) -> AppResult<()> {
    store.declare_index(PROJECTS, "ownerId").await?;
    store.declare_index(SCRIPTS, "ownerId").await?;
    store.declare_index(SCRIPTS, "projectId").await?;
    store.declare_index(SCRIPTS, "folderId").await?;
    info!("Store indexes declared");
    Ok(())
}

pub(crate) fn to_doc<T: Serialize>(entity: &T) -> AppResult<Value> {
    Ok(serde_json::to_value(entity)?)
}

pub(crate) fn from_doc<T: DeserializeOwned>(doc: Value) -> AppResult<T> {
    Ok(serde_json::from_value(doc)?)
}

/// Page size used when draining every match of a query.
const DRAIN_PAGE_SIZE: u64 = 100;

/// Collect every document matching `query`, page by page.
pub(crate) async fn fetch_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    query: FindQuery,
) -> AppResult<Vec<T>> {
    let mut out = Vec::new();
    let mut page_no = 1;
    loop {
        let page = store
            .find(collection, &query.clone().page(PageRequest::new(page_no, DRAIN_PAGE_SIZE)))
            .await?;
        let has_next = page.has_next;
        for doc in page.items {
            out.push(from_doc(doc)?);
        }
        if !has_next {
            return Ok(out);
        }
        page_no += 1;
    }
}
