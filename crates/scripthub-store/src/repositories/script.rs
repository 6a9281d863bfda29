//! Script repository implementation.

use std::sync::Arc;

use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::traits::store::{DocumentStore, FindQuery};
use scripthub_core::types::{
    FilterField, FolderId, PageRequest, PageResponse, ProjectId, ScriptId, SortField,
};
use scripthub_entity::script::Script;

use super::{SCRIPTS, fetch_all, from_doc, to_doc};

/// Repository for script documents.
#[derive(Debug, Clone)]
pub struct ScriptRepository {
    store: Arc<dyn DocumentStore>,
}

fn in_project(project_id: ProjectId) -> FilterField {
    FilterField::eq("projectId", project_id.to_string())
}

fn in_folders(folder_ids: &[FolderId]) -> FilterField {
    FilterField::one_of("folderId", folder_ids.iter().map(ToString::to_string).collect())
}

impl ScriptRepository {
    /// Create a new script repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find a script by ID.
    pub async fn find_by_id(&self, id: ScriptId) -> AppResult<Option<Script>> {
        self.store
            .find_by_id(SCRIPTS, &id.to_string())
            .await?
            .map(from_doc)
            .transpose()
    }

    /// Find a script by ID, failing with not-found when absent.
    pub async fn get(&self, id: ScriptId) -> AppResult<Script> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Script {id} not found")))
    }

    /// List a project's scripts, most recently updated first.
    pub async fn find_by_project(
        &self,
        project_id: ProjectId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Script>> {
        let query = FindQuery::all()
            .filter(in_project(project_id))
            .sort(SortField::desc("updatedAt"))
            .page(page.clone());
        self.store.find(SCRIPTS, &query).await?.try_map(from_doc)
    }

    /// List a folder's scripts, ordered by title.
    pub async fn find_by_folder(
        &self,
        project_id: ProjectId,
        folder_id: FolderId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Script>> {
        let query = FindQuery::all()
            .filter(in_project(project_id))
            .filter(FilterField::eq("folderId", folder_id.to_string()))
            .sort(SortField::asc("title"))
            .page(page.clone());
        self.store.find(SCRIPTS, &query).await?.try_map(from_doc)
    }

    /// Every script filed under any of the given folders.
    pub async fn find_all_in_folders(
        &self,
        project_id: ProjectId,
        folder_ids: &[FolderId],
    ) -> AppResult<Vec<Script>> {
        let query = FindQuery::all()
            .filter(in_project(project_id))
            .filter(in_folders(folder_ids));
        fetch_all(self.store.as_ref(), SCRIPTS, query).await
    }

    /// Every script in a project.
    pub async fn find_all_in_project(&self, project_id: ProjectId) -> AppResult<Vec<Script>> {
        fetch_all(
            self.store.as_ref(),
            SCRIPTS,
            FindQuery::all().filter(in_project(project_id)),
        )
        .await
    }

    /// Case-insensitive title search within a project.
    pub async fn search_by_title(
        &self,
        project_id: ProjectId,
        needle: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Script>> {
        let query = FindQuery::all()
            .filter(in_project(project_id))
            .filter(FilterField::contains("title", needle))
            .sort(SortField::asc("title"))
            .page(page.clone());
        self.store.find(SCRIPTS, &query).await?.try_map(from_doc)
    }

    /// Insert a new script.
    pub async fn create(&self, script: &Script) -> AppResult<Script> {
        let doc = self
            .store
            .create(SCRIPTS, &script.id.to_string(), to_doc(script)?)
            .await?;
        from_doc(doc)
    }

    /// Replace a stored script with `script`.
    pub async fn update(&self, script: &Script) -> AppResult<Script> {
        let doc = self
            .store
            .replace(SCRIPTS, &script.id.to_string(), to_doc(script)?)
            .await?;
        from_doc(doc)
    }

    /// Delete a script. Returns `true` if it existed.
    pub async fn delete(&self, id: ScriptId) -> AppResult<bool> {
        self.store.delete(SCRIPTS, &id.to_string()).await
    }

    /// Delete every script filed under any of the given folders.
    pub async fn delete_in_folders(
        &self,
        project_id: ProjectId,
        folder_ids: &[FolderId],
    ) -> AppResult<u64> {
        self.store
            .delete_many(SCRIPTS, &[in_project(project_id), in_folders(folder_ids)])
            .await
    }

    /// Delete every script in a project.
    pub async fn delete_in_project(&self, project_id: ProjectId) -> AppResult<u64> {
        self.store.delete_many(SCRIPTS, &[in_project(project_id)]).await
    }
}
