//! Project lifecycle and script-count reconciliation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::types::{FolderId, PageRequest, PageResponse, ProjectId, ScriptId, UserId};
use scripthub_entity::project::{CreateProject, Project, ProjectStats, UpdateProject};
use scripthub_store::repositories::{ProjectRepository, ScriptRepository};

use crate::context::ServiceContext;
use crate::folder::{FolderService, FolderTree};

/// A folder whose cached count disagreed with the scripts on record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderDrift {
    /// The folder.
    pub folder_id: FolderId,
    /// `scriptCount` before reconciliation.
    pub cached: u64,
    /// Scripts actually filed under the folder.
    pub actual: u64,
}

/// Result of [`ProjectService::reconcile_script_counts`].
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    /// The project after reconciliation.
    pub project: Project,
    /// Folders whose counts were corrected.
    pub drift: Vec<FolderDrift>,
    /// Scripts referencing folders that no longer exist.
    pub orphaned_scripts: Vec<ScriptId>,
}

impl ReconcileReport {
    /// Whether every cached count was already correct.
    pub fn is_clean(&self) -> bool {
        self.drift.is_empty()
    }
}

/// Manages projects.
#[derive(Debug, Clone)]
pub struct ProjectService {
    /// Project repository.
    projects: Arc<ProjectRepository>,
    /// Script repository (for cascade and recount).
    scripts: Arc<ScriptRepository>,
    /// Folder service (for committing recounted forests).
    folders: FolderService,
    /// Clock, ids, validator.
    ctx: ServiceContext,
}

impl ProjectService {
    /// Creates a new project service.
    pub fn new(
        projects: Arc<ProjectRepository>,
        scripts: Arc<ScriptRepository>,
        folders: FolderService,
        ctx: ServiceContext,
    ) -> Self {
        Self {
            projects,
            scripts,
            folders,
            ctx,
        }
    }

    /// Creates an empty project.
    pub async fn create_project(&self, req: CreateProject) -> AppResult<Project> {
        let now = self.ctx.now();
        let project = Project {
            id: ProjectId::from_uuid(self.ctx.ids.next_id()),
            owner_id: req.owner_id,
            title: req.title.trim().to_string(),
            description: req.description,
            folders: Vec::new(),
            settings: req.settings,
            stats: ProjectStats::default(),
            created_at: now,
            updated_at: now,
        };
        self.ctx.validator.project(&project)?;

        let project = self.projects.create(&project).await?;
        info!(project_id = %project.id, owner_id = %project.owner_id, "Project created");
        Ok(project)
    }

    /// Gets a project by ID.
    pub async fn get_project(&self, project_id: ProjectId) -> AppResult<Project> {
        self.projects.get(project_id).await
    }

    /// Lists an owner's projects, most recently updated first.
    pub async fn list_by_owner(
        &self,
        owner_id: UserId,
        page: PageRequest,
    ) -> AppResult<PageResponse<Project>> {
        self.projects.find_by_owner(owner_id, &page).await
    }

    /// Case-insensitive title search within an owner's projects.
    pub async fn search(
        &self,
        owner_id: UserId,
        needle: &str,
        page: PageRequest,
    ) -> AppResult<PageResponse<Project>> {
        self.projects.search_by_title(owner_id, needle, &page).await
    }

    /// Updates title, description, or settings.
    pub async fn update_project(
        &self,
        project_id: ProjectId,
        req: UpdateProject,
    ) -> AppResult<Project> {
        if req.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }

        let mut project = self.projects.get(project_id).await?;
        if let Some(title) = req.title {
            project.title = title.trim().to_string();
        }
        if let Some(description) = req.description {
            project.description = description;
        }
        if let Some(settings) = req.settings {
            project.settings = settings;
        }
        project.updated_at = self.ctx.now();
        self.ctx.validator.project(&project)?;

        let project = self.projects.update(&project).await?;
        info!(project_id = %project_id, "Project updated");
        Ok(project)
    }

    /// Deletes a project and every script in it.
    ///
    /// Returns the number of scripts deleted.
    pub async fn delete_project(&self, project_id: ProjectId) -> AppResult<u64> {
        // Existence check first so a missing project is NotFound, not a no-op.
        self.projects.get(project_id).await?;

        let scripts_deleted = self.scripts.delete_in_project(project_id).await?;
        self.projects.delete(project_id).await?;

        info!(project_id = %project_id, scripts_deleted, "Project deleted");
        Ok(scripts_deleted)
    }

    /// Recounts the scripts filed under each folder and rewrites the cached
    /// `scriptCount`s and `stats.totalScripts`.
    pub async fn reconcile_script_counts(&self, project_id: ProjectId) -> AppResult<ReconcileReport> {
        let project = self.projects.get(project_id).await?;
        let scripts = self.scripts.find_all_in_project(project_id).await?;

        let mut actual: HashMap<FolderId, u64> = HashMap::new();
        let mut orphaned_scripts = Vec::new();
        for script in &scripts {
            if FolderTree::find_by_id(&project.folders, script.folder_id).is_some() {
                *actual.entry(script.folder_id).or_default() += 1;
            } else {
                orphaned_scripts.push(script.id);
            }
        }

        let drift: Vec<FolderDrift> = FolderTree::flatten(&project.folders)
            .into_iter()
            .filter_map(|(_, node)| {
                let real = actual.get(&node.id).copied().unwrap_or(0);
                (real != node.script_count).then_some(FolderDrift {
                    folder_id: node.id,
                    cached: node.script_count,
                    actual: real,
                })
            })
            .collect();

        for entry in &drift {
            warn!(
                project_id = %project_id,
                folder_id = %entry.folder_id,
                cached = entry.cached,
                actual = entry.actual,
                "Script count drift corrected"
            );
        }
        if !orphaned_scripts.is_empty() {
            warn!(
                project_id = %project_id,
                orphaned = orphaned_scripts.len(),
                "Scripts reference folders that no longer exist"
            );
        }

        let stats_stale = project.stats.total_scripts != FolderTree::total_scripts(&project.folders);
        let project = if drift.is_empty() && !stats_stale {
            project
        } else {
            let forest = FolderTree::with_script_counts(&project.folders, &actual);
            self.folders.commit(project, forest).await?
        };

        info!(
            project_id = %project_id,
            folders_corrected = drift.len(),
            total_scripts = project.stats.total_scripts,
            "Script counts reconciled"
        );

        Ok(ReconcileReport {
            project,
            drift,
            orphaned_scripts,
        })
    }
}
