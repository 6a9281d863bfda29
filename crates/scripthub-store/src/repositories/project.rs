//! Project repository implementation.

use std::sync::Arc;

use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::traits::store::{DocumentStore, FindQuery};
use scripthub_core::types::{FilterField, PageRequest, PageResponse, ProjectId, SortField, UserId};
use scripthub_entity::project::Project;

use super::{PROJECTS, from_doc, to_doc};

/// Repository for project documents.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProjectRepository {
    /// Create a new project repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find a project by ID.
    pub async fn find_by_id(&self, id: ProjectId) -> AppResult<Option<Project>> {
        self.store
            .find_by_id(PROJECTS, &id.to_string())
            .await?
            .map(from_doc)
            .transpose()
    }

    /// Find a project by ID, failing with not-found when absent.
    pub async fn get(&self, id: ProjectId) -> AppResult<Project> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))
    }

    /// List an owner's projects, most recently updated first.
    pub async fn find_by_owner(
        &self,
        owner_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Project>> {
        let query = FindQuery::all()
            .filter(FilterField::eq("ownerId", owner_id.to_string()))
            .sort(SortField::desc("updatedAt"))
            .page(page.clone());
        self.store.find(PROJECTS, &query).await?.try_map(from_doc)
    }

    /// Case-insensitive title search within an owner's projects.
    pub async fn search_by_title(
        &self,
        owner_id: UserId,
        needle: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Project>> {
        let query = FindQuery::all()
            .filter(FilterField::eq("ownerId", owner_id.to_string()))
            .filter(FilterField::contains("title", needle))
            .sort(SortField::asc("title"))
            .page(page.clone());
        self.store.find(PROJECTS, &query).await?.try_map(from_doc)
    }

    /// Insert a new project.
    pub async fn create(&self, project: &Project) -> AppResult<Project> {
        let doc = self
            .store
            .create(PROJECTS, &project.id.to_string(), to_doc(project)?)
            .await?;
        from_doc(doc)
    }

    /// Replace a stored project with `project`.
    pub async fn update(&self, project: &Project) -> AppResult<Project> {
        let doc = self
            .store
            .replace(PROJECTS, &project.id.to_string(), to_doc(project)?)
            .await?;
        from_doc(doc)
    }

    /// Delete a project. Returns `true` if it existed.
    pub async fn delete(&self, id: ProjectId) -> AppResult<bool> {
        self.store.delete(PROJECTS, &id.to_string()).await
    }
}
