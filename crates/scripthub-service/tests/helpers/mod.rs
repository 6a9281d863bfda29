//! Shared test helpers for service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use scripthub_core::config::limits::LimitsConfig;
use scripthub_core::traits::{DocumentStore, FixedClock, UuidGenerator};
use scripthub_core::types::{FolderId, ProjectId, UserId};
use scripthub_entity::folder::CreateFolder;
use scripthub_entity::project::{CreateProject, Project};
use scripthub_entity::script::{CreateScript, Script, ScriptMetadata};
use scripthub_service::{FolderService, ProjectService, ScriptService, ServiceContext};
use scripthub_store::memory::MemoryDocumentStore;
use scripthub_store::repositories::{self, ProjectRepository, ScriptRepository};

/// Services wired over a fresh in-memory store.
pub struct TestApp {
    /// The raw store, for direct inspection.
    pub store: Arc<MemoryDocumentStore>,
    /// Project service.
    pub projects: ProjectService,
    /// Folder service.
    pub folders: FolderService,
    /// Script service.
    pub scripts: ScriptService,
    /// Raw script repository, for out-of-band writes.
    pub script_repo: Arc<ScriptRepository>,
    /// The owner used by the helpers.
    pub owner: UserId,
}

impl TestApp {
    /// Create a new test application with default limits.
    pub async fn new() -> Self {
        Self::with_limits(LimitsConfig::default()).await
    }

    /// Create a new test application with custom limits.
    pub async fn with_limits(limits: LimitsConfig) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let dyn_store: Arc<dyn DocumentStore> = store.clone();
        repositories::ensure_indexes(dyn_store.as_ref())
            .await
            .expect("Failed to declare indexes");

        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
            .single()
            .expect("valid start time");
        let ctx = ServiceContext::new(
            Arc::new(FixedClock::new(start)),
            Arc::new(UuidGenerator),
            limits,
        );

        let project_repo = Arc::new(ProjectRepository::new(dyn_store.clone()));
        let script_repo = Arc::new(ScriptRepository::new(dyn_store));

        let folders = FolderService::new(project_repo.clone(), script_repo.clone(), ctx.clone());
        let projects = ProjectService::new(
            project_repo.clone(),
            script_repo.clone(),
            folders.clone(),
            ctx.clone(),
        );
        let scripts = ScriptService::new(script_repo.clone(), project_repo, folders.clone(), ctx);

        Self {
            store,
            projects,
            folders,
            scripts,
            script_repo,
            owner: UserId::from_uuid(Uuid::new_v4()),
        }
    }

    /// Folder and script services over the same store, enforcing `limits`.
    ///
    /// Models a deployment whose limits were tightened after data was
    /// written under looser ones.
    pub fn services_with_limits(&self, limits: LimitsConfig) -> (FolderService, ScriptService) {
        let dyn_store: Arc<dyn DocumentStore> = self.store.clone();
        let start = Utc
            .with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
            .single()
            .expect("valid start time");
        let ctx = ServiceContext::new(
            Arc::new(FixedClock::new(start)),
            Arc::new(UuidGenerator),
            limits,
        );

        let project_repo = Arc::new(ProjectRepository::new(dyn_store.clone()));
        let script_repo = Arc::new(ScriptRepository::new(dyn_store));
        let folders = FolderService::new(project_repo.clone(), script_repo.clone(), ctx.clone());
        let scripts = ScriptService::new(script_repo, project_repo, folders.clone(), ctx);
        (folders, scripts)
    }

    /// A project holding `A > B > C` and a root `D` with one script.
    ///
    /// Returns the project, `A`, `D`, and the script.
    pub async fn three_deep(&self) -> (Project, FolderId, FolderId, Script) {
        let project = self.project("Deep").await;
        let a = self.folder(project.id, "A", None).await;
        let b = self.folder(project.id, "B", Some(a)).await;
        self.folder(project.id, "C", Some(b)).await;
        let d = self.folder(project.id, "D", None).await;
        let script = self.script(project.id, d, "kept").await;
        (project, a, d, script)
    }

    /// Limits that reject any forest nested deeper than two levels.
    pub fn two_levels() -> LimitsConfig {
        LimitsConfig {
            max_folder_depth: 2,
            ..LimitsConfig::default()
        }
    }

    /// Create a project owned by [`TestApp::owner`].
    pub async fn project(&self, title: &str) -> Project {
        self.projects
            .create_project(CreateProject {
                owner_id: self.owner,
                title: title.to_string(),
                description: String::new(),
                settings: Default::default(),
            })
            .await
            .expect("Failed to create project")
    }

    /// Create a folder and return its id.
    pub async fn folder(
        &self,
        project_id: ProjectId,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> FolderId {
        let (_, folder) = self
            .folders
            .create_folder(
                project_id,
                CreateFolder {
                    name: name.to_string(),
                    parent_id,
                },
            )
            .await
            .expect("Failed to create folder");
        folder.id
    }

    /// Create a script with the given content.
    pub async fn script(&self, project_id: ProjectId, folder_id: FolderId, content: &str) -> Script {
        self.scripts
            .create_script(self.script_input(project_id, folder_id, content))
            .await
            .expect("Failed to create script")
    }

    /// A script creation request with no imported history.
    pub fn script_input(
        &self,
        project_id: ProjectId,
        folder_id: FolderId,
        content: &str,
    ) -> CreateScript {
        CreateScript {
            owner_id: self.owner,
            project_id,
            folder_id,
            title: format!("Script {content}"),
            content: content.to_string(),
            metadata: ScriptMetadata::default(),
            versions: Vec::new(),
        }
    }

    /// Cached script count of a folder.
    pub async fn count_of(&self, project_id: ProjectId, folder_id: FolderId) -> u64 {
        self.folders
            .find_folder(project_id, folder_id)
            .await
            .expect("Folder should exist")
            .script_count
    }
}
