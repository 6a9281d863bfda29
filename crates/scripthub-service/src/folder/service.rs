//! Folder operations scoped to one project document.
//!
//! Each operation reads the project, computes a new forest with
//! [`FolderTree`], validates it, and writes the whole project back.
//! Operations that also write scripts validate the forest first.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::types::{FolderId, ProjectId};
use scripthub_entity::folder::{CreateFolder, FolderNode, FolderPatch};
use scripthub_entity::project::Project;
use scripthub_store::repositories::{ProjectRepository, ScriptRepository};

use super::tree::FolderTree;
use crate::context::ServiceContext;

/// What happens to scripts filed under a deleted folder subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy", content = "folderId")]
pub enum DeletePolicy {
    /// Delete the scripts along with the folders.
    CascadeDelete,
    /// Move the scripts into a folder that survives the deletion.
    ReassignTo(FolderId),
}

/// Outcome of a folder deletion.
#[derive(Debug, Clone)]
pub struct FolderDeletion {
    /// The project after the deletion was committed.
    pub project: Project,
    /// The removed folder and all its descendants.
    pub removed_folders: Vec<FolderId>,
    /// Scripts deleted under [`DeletePolicy::CascadeDelete`].
    pub scripts_deleted: u64,
    /// Scripts moved under [`DeletePolicy::ReassignTo`].
    pub scripts_reassigned: u64,
}

/// Manages a project's folder forest.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Project repository.
    projects: Arc<ProjectRepository>,
    /// Script repository (for delete policies).
    scripts: Arc<ScriptRepository>,
    /// Clock, ids, validator.
    ctx: ServiceContext,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        projects: Arc<ProjectRepository>,
        scripts: Arc<ScriptRepository>,
        ctx: ServiceContext,
    ) -> Self {
        Self {
            projects,
            scripts,
            ctx,
        }
    }

    /// The project's folder forest.
    pub async fn get_tree(&self, project_id: ProjectId) -> AppResult<Vec<FolderNode>> {
        Ok(self.projects.get(project_id).await?.folders)
    }

    /// A single folder of a project.
    pub async fn find_folder(
        &self,
        project_id: ProjectId,
        folder_id: FolderId,
    ) -> AppResult<FolderNode> {
        let project = self.projects.get(project_id).await?;
        FolderTree::find_by_id(&project.folders, folder_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Creates a folder as a new root or under an existing parent.
    pub async fn create_folder(
        &self,
        project_id: ProjectId,
        req: CreateFolder,
    ) -> AppResult<(Project, FolderNode)> {
        self.ctx.validator.folder_name(&req.name)?;
        let project = self.projects.get(project_id).await?;

        let folder = FolderNode::new(
            FolderId::from_uuid(self.ctx.ids.next_id()),
            req.name.trim(),
            req.parent_id,
            self.ctx.now(),
        );
        let forest = FolderTree::insert(&project.folders, folder.clone(), req.parent_id)?;
        let project = self.commit(project, forest).await?;

        info!(
            project_id = %project_id,
            folder_id = %folder.id,
            parent_id = ?req.parent_id,
            "Folder created"
        );

        Ok((project, folder))
    }

    /// Applies a patch (currently: rename) to a folder.
    pub async fn rename_folder(
        &self,
        project_id: ProjectId,
        folder_id: FolderId,
        patch: FolderPatch,
    ) -> AppResult<Project> {
        let patch = FolderPatch {
            name: patch.name.map(|name| name.trim().to_string()),
        };
        if let Some(name) = &patch.name {
            self.ctx.validator.folder_name(name)?;
        }

        let project = self.projects.get(project_id).await?;
        let forest = FolderTree::update(&project.folders, folder_id, &patch)?;
        let project = self.commit(project, forest).await?;

        info!(project_id = %project_id, folder_id = %folder_id, "Folder renamed");
        Ok(project)
    }

    /// Re-homes a folder and its subtree under a new parent, or to the root.
    pub async fn move_folder(
        &self,
        project_id: ProjectId,
        folder_id: FolderId,
        new_parent: Option<FolderId>,
    ) -> AppResult<Project> {
        let project = self.projects.get(project_id).await?;
        let forest = FolderTree::move_folder(&project.folders, folder_id, new_parent)?;
        let project = self.commit(project, forest).await?;

        info!(
            project_id = %project_id,
            folder_id = %folder_id,
            new_parent = ?new_parent,
            "Folder moved"
        );
        Ok(project)
    }

    /// Removes a folder and its subtree, then deals with the scripts that
    /// referenced any removed folder according to `policy`.
    pub async fn delete_folder(
        &self,
        project_id: ProjectId,
        folder_id: FolderId,
        policy: DeletePolicy,
    ) -> AppResult<FolderDeletion> {
        let project = self.projects.get(project_id).await?;
        let removed = FolderTree::descendant_ids(&project.folders, folder_id)
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        let forest = FolderTree::remove(&project.folders, folder_id)?;

        // The new forest is staged before any script is touched so a
        // rejected deletion leaves the scripts where they were.
        let (staged, scripts_deleted, scripts_reassigned) = match policy {
            DeletePolicy::CascadeDelete => {
                let staged = self.stage(project, forest)?;
                let deleted = self.scripts.delete_in_folders(project_id, &removed).await?;
                (staged, deleted, 0)
            }
            DeletePolicy::ReassignTo(target) => {
                if removed.contains(&target) {
                    return Err(AppError::invalid_hierarchy(format!(
                        "Cannot reassign scripts into folder {target}, it is being deleted"
                    )));
                }
                if FolderTree::find_by_id(&forest, target).is_none() {
                    return Err(AppError::not_found(format!("Folder {target} not found")));
                }

                let orphans = self.scripts.find_all_in_folders(project_id, &removed).await?;
                let delta = i64::try_from(orphans.len()).unwrap_or(i64::MAX);
                let forest = FolderTree::adjust_script_count(&forest, target, delta)?;
                let staged = self.stage(project, forest)?;

                let mut reassigned = 0;
                for mut script in orphans {
                    script.folder_id = target;
                    script.updated_at = staged.updated_at;
                    self.scripts.update(&script).await?;
                    reassigned += 1;
                }
                (staged, 0, reassigned)
            }
        };

        let project = self.persist(&staged).await?;

        info!(
            project_id = %project_id,
            folder_id = %folder_id,
            removed_folders = removed.len(),
            scripts_deleted,
            scripts_reassigned,
            "Folder deleted"
        );

        Ok(FolderDeletion {
            project,
            removed_folders: removed,
            scripts_deleted,
            scripts_reassigned,
        })
    }

    /// Shifts a folder's cached script count by `delta`, clamped at zero.
    pub async fn adjust_script_count(
        &self,
        project_id: ProjectId,
        folder_id: FolderId,
        delta: i64,
    ) -> AppResult<Project> {
        let project = self.projects.get(project_id).await?;
        let forest = FolderTree::adjust_script_count(&project.folders, folder_id, delta)?;
        self.commit(project, forest).await
    }

    /// Ids of every folder currently in the project.
    pub async fn folder_ids(&self, project_id: ProjectId) -> AppResult<HashSet<FolderId>> {
        let project = self.projects.get(project_id).await?;
        Ok(FolderTree::flatten(&project.folders)
            .into_iter()
            .map(|(_, node)| node.id)
            .collect())
    }

    /// Validates `forest`, installs it on `project` with refreshed stats,
    /// and persists the project.
    pub(crate) async fn commit(&self, project: Project, forest: Vec<FolderNode>) -> AppResult<Project> {
        let staged = self.stage(project, forest)?;
        self.persist(&staged).await
    }

    /// Validates `forest` and installs it on `project` without writing.
    ///
    /// Callers that also write scripts stage first, so a forest the
    /// validator rejects fails the operation before anything is stored.
    pub(crate) fn stage(&self, mut project: Project, forest: Vec<FolderNode>) -> AppResult<Project> {
        self.ctx.validator.forest(&forest)?;
        project.stats.total_scripts = FolderTree::total_scripts(&forest);
        project.folders = forest;
        project.updated_at = self.ctx.now();
        Ok(project)
    }

    /// Writes a staged project.
    pub(crate) async fn persist(&self, project: &Project) -> AppResult<Project> {
        self.projects.update(project).await
    }
}
