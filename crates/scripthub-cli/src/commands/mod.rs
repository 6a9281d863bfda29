//! CLI command definitions and dispatch.

pub mod folder;
pub mod project;
pub mod script;
pub mod store;

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use scripthub_core::config::AppConfig;
use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::traits::DocumentStore;
use scripthub_service::{FolderService, ProjectService, ScriptService, ServiceContext};
use scripthub_store::StoreManager;
use scripthub_store::repositories::{self, ProjectRepository, ScriptRepository};

use crate::output::OutputFormat;

/// ScriptHub: organize video scripts into projects and folders
#[derive(Debug, Parser)]
#[command(name = "scripthub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Project management
    Project(project::ProjectArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Script editing and history
    Script(script::ScriptArgs),
    /// Document store maintenance
    Store(store::StoreArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let services = AppServices::build(config).await?;
        match &self.command {
            Commands::Project(args) => project::execute(args, &services, self.format).await,
            Commands::Folder(args) => folder::execute(args, &services, self.format).await,
            Commands::Script(args) => script::execute(args, &services, self.format).await,
            Commands::Store(args) => store::execute(args, &services, self.format).await,
        }
    }
}

/// Every service, constructed once from configuration.
#[derive(Debug, Clone)]
pub struct AppServices {
    /// The configured document store.
    pub store: Arc<StoreManager>,
    /// Project service.
    pub projects: ProjectService,
    /// Folder service.
    pub folders: FolderService,
    /// Script service.
    pub scripts: ScriptService,
}

impl AppServices {
    /// Connect the store, declare indexes, and wire the services.
    pub async fn build(config: &AppConfig) -> AppResult<Self> {
        let store = Arc::new(StoreManager::new(&config.store).await?);
        repositories::ensure_indexes(store.as_ref()).await?;

        let dyn_store: Arc<dyn DocumentStore> = store.clone();
        let project_repo = Arc::new(ProjectRepository::new(dyn_store.clone()));
        let script_repo = Arc::new(ScriptRepository::new(dyn_store));
        let ctx = ServiceContext::system(config.limits.clone());

        let folders = FolderService::new(project_repo.clone(), script_repo.clone(), ctx.clone());
        let projects = ProjectService::new(
            project_repo.clone(),
            script_repo.clone(),
            folders.clone(),
            ctx.clone(),
        );
        let scripts = ScriptService::new(script_repo, project_repo, folders.clone(), ctx);

        Ok(Self {
            store,
            projects,
            folders,
            scripts,
        })
    }
}

/// Parse a typed identifier from a command-line argument.
pub fn parse_id<T>(label: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| AppError::validation(format!("Invalid {label} '{raw}': {e}")))
}

/// Content from `--content`, or read from `--file`.
pub async fn read_content(content: &Option<String>, file: &Option<String>) -> AppResult<String> {
    match (content, file) {
        (Some(text), None) => Ok(text.clone()),
        (None, Some(path)) => Ok(tokio::fs::read_to_string(path).await?),
        (None, None) => Ok(String::new()),
        (Some(_), Some(_)) => Err(AppError::validation(
            "Pass either --content or --file, not both",
        )),
    }
}
