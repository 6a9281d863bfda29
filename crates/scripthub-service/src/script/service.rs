//! Script CRUD and versioning over the store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::types::{FolderId, PageRequest, PageResponse, ProjectId, ScriptId};
use scripthub_entity::project::Project;
use scripthub_entity::script::{CreateScript, MetadataPatch, Script, ScriptVersion};
use scripthub_store::repositories::{ProjectRepository, ScriptRepository};

use super::versioning::VersionedScript;
use crate::context::ServiceContext;
use crate::folder::{FolderService, FolderTree};

/// Fields that change without recording a new version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScriptDetails {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// Metadata changes merged field by field.
    #[serde(default)]
    pub metadata: Option<MetadataPatch>,
}

/// Manages scripts and their version history.
#[derive(Debug, Clone)]
pub struct ScriptService {
    /// Script repository.
    scripts: Arc<ScriptRepository>,
    /// Project repository (for folder lookups).
    projects: Arc<ProjectRepository>,
    /// Folder service (for script-count bookkeeping).
    folders: FolderService,
    /// Clock, ids, validator.
    ctx: ServiceContext,
}

fn require_folder(project: &Project, folder_id: FolderId) -> AppResult<()> {
    FolderTree::find_by_id(&project.folders, folder_id)
        .map(|_| ())
        .ok_or_else(|| {
            AppError::not_found(format!(
                "Folder {folder_id} not found in project {}",
                project.id
            ))
        })
}

impl ScriptService {
    /// Creates a new script service.
    pub fn new(
        scripts: Arc<ScriptRepository>,
        projects: Arc<ProjectRepository>,
        folders: FolderService,
        ctx: ServiceContext,
    ) -> Self {
        Self {
            scripts,
            projects,
            folders,
            ctx,
        }
    }

    /// Creates a script in an existing folder and bumps that folder's count.
    pub async fn create_script(&self, mut req: CreateScript) -> AppResult<Script> {
        req.title = req.title.trim().to_string();
        let project = self.projects.get(req.project_id).await?;
        require_folder(&project, req.folder_id)?;

        let script = VersionedScript::create_with_initial_version(
            req,
            ScriptId::from_uuid(self.ctx.ids.next_id()),
            self.ctx.now(),
        );
        self.ctx.validator.script(&script)?;
        let forest = FolderTree::adjust_script_count(&project.folders, script.folder_id, 1)?;
        let project = self.folders.stage(project, forest)?;

        let script = self.scripts.create(&script).await?;
        self.folders.persist(&project).await?;

        info!(
            script_id = %script.id,
            project_id = %script.project_id,
            folder_id = %script.folder_id,
            "Script created"
        );

        Ok(script)
    }

    /// Gets a script by ID.
    pub async fn get_script(&self, script_id: ScriptId) -> AppResult<Script> {
        self.scripts.get(script_id).await
    }

    /// Lists a project's scripts, most recently updated first.
    pub async fn list_project(
        &self,
        project_id: ProjectId,
        page: PageRequest,
    ) -> AppResult<PageResponse<Script>> {
        self.scripts.find_by_project(project_id, &page).await
    }

    /// Lists a folder's scripts by title.
    pub async fn list_folder(
        &self,
        project_id: ProjectId,
        folder_id: FolderId,
        page: PageRequest,
    ) -> AppResult<PageResponse<Script>> {
        self.scripts.find_by_folder(project_id, folder_id, &page).await
    }

    /// Case-insensitive title search within a project.
    pub async fn search(
        &self,
        project_id: ProjectId,
        needle: &str,
        page: PageRequest,
    ) -> AppResult<PageResponse<Script>> {
        self.scripts.search_by_title(project_id, needle, &page).await
    }

    /// Replaces the content, appending a new version.
    pub async fn update_content(
        &self,
        script_id: ScriptId,
        content: &str,
        metadata: Option<MetadataPatch>,
    ) -> AppResult<Script> {
        self.ctx.validator.content(content)?;
        let script = self.scripts.get(script_id).await?;
        let updated =
            VersionedScript::append_version(&script, content, metadata, self.ctx.now())?;
        let updated = self.save(updated).await?;

        info!(
            script_id = %script_id,
            version = updated.latest_version(),
            "Script version appended"
        );
        Ok(updated)
    }

    /// Changes title or metadata. No version is recorded.
    pub async fn update_details(
        &self,
        script_id: ScriptId,
        req: UpdateScriptDetails,
    ) -> AppResult<Script> {
        let mut script = self.scripts.get(script_id).await?;
        if let Some(title) = req.title {
            script.title = title.trim().to_string();
        }
        if let Some(patch) = req.metadata {
            script.metadata.apply(patch);
        }
        script.updated_at = self.ctx.now();
        self.save(script).await
    }

    /// Copies an old version's content forward as a new version.
    pub async fn revert(&self, script_id: ScriptId, version: u32) -> AppResult<Script> {
        let script = self.scripts.get(script_id).await?;
        let updated = VersionedScript::revert_to_version(&script, version, self.ctx.now())?;
        let updated = self.save(updated).await?;

        info!(
            script_id = %script_id,
            reverted_to = version,
            version = updated.latest_version(),
            "Script reverted"
        );
        Ok(updated)
    }

    /// The version history, most recent first.
    pub async fn history(&self, script_id: ScriptId) -> AppResult<Vec<ScriptVersion>> {
        let script = self.scripts.get(script_id).await?;
        Ok(VersionedScript::version_history(&script))
    }

    /// A single recorded version.
    pub async fn get_version(&self, script_id: ScriptId, version: u32) -> AppResult<ScriptVersion> {
        let script = self.scripts.get(script_id).await?;
        VersionedScript::get_version(&script, version).cloned()
    }

    /// Files a script under another folder of the same project.
    pub async fn move_script(&self, script_id: ScriptId, target: FolderId) -> AppResult<Script> {
        let mut script = self.scripts.get(script_id).await?;
        let project = self.projects.get(script.project_id).await?;
        require_folder(&project, target)?;

        let source = script.folder_id;
        if source == target {
            return Ok(script);
        }

        script.folder_id = target;
        script.updated_at = self.ctx.now();
        self.ctx.validator.script(&script)?;

        let mut forest = FolderTree::adjust_script_count(&project.folders, target, 1)?;
        if FolderTree::find_by_id(&forest, source).is_some() {
            forest = FolderTree::adjust_script_count(&forest, source, -1)?;
        } else {
            warn!(script_id = %script_id, folder_id = %source, "Script moved out of a missing folder");
        }
        let project = self.folders.stage(project, forest)?;

        let script = self.scripts.update(&script).await?;
        self.folders.persist(&project).await?;

        info!(script_id = %script_id, from = %source, to = %target, "Script moved");
        Ok(script)
    }

    /// Deletes a script and decrements its folder's count.
    ///
    /// The decremented forest is validated before the script is removed.
    pub async fn delete_script(&self, script_id: ScriptId) -> AppResult<bool> {
        let Some(script) = self.scripts.find_by_id(script_id).await? else {
            return Ok(false);
        };

        let staged = match self.projects.find_by_id(script.project_id).await? {
            Some(project) if FolderTree::find_by_id(&project.folders, script.folder_id).is_some() => {
                let forest =
                    FolderTree::adjust_script_count(&project.folders, script.folder_id, -1)?;
                Some(self.folders.stage(project, forest)?)
            }
            _ => None,
        };

        if !self.scripts.delete(script_id).await? {
            return Ok(false);
        }
        match staged {
            Some(project) => {
                self.folders.persist(&project).await?;
            }
            None => warn!(
                script_id = %script_id,
                folder_id = %script.folder_id,
                "Deleted script referenced a missing folder"
            ),
        }

        info!(script_id = %script_id, project_id = %script.project_id, "Script deleted");
        Ok(true)
    }

    async fn save(&self, script: Script) -> AppResult<Script> {
        self.ctx.validator.script(&script)?;
        self.scripts.update(&script).await
    }
}
