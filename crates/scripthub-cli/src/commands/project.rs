//! Project management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use scripthub_core::result::AppResult;
use scripthub_core::types::{PageRequest, ProjectId, UserId};
use scripthub_entity::project::{CreateProject, Project, UpdateProject};

use super::{AppServices, parse_id};
use crate::output::{self, OutputFormat};

/// Arguments for project commands
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Project subcommand
    #[command(subcommand)]
    pub command: ProjectCommand,
}

/// Project subcommands
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create a new project
    Create {
        /// Owning user ID
        #[arg(short, long)]
        owner: String,
        /// Project title
        #[arg(short, long)]
        title: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List an owner's projects
    List {
        /// Owning user ID
        #[arg(short, long)]
        owner: String,
        /// Only titles containing this text
        #[arg(short, long)]
        search: Option<String>,
        /// Page number
        #[arg(long, default_value = "1")]
        page: u64,
        /// Page size
        #[arg(long, default_value = "25")]
        size: u64,
    },
    /// Show a project
    Show {
        /// Project ID
        id: String,
    },
    /// Change a project's title or description
    Update {
        /// Project ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a project and all its scripts
    Delete {
        /// Project ID
        id: String,
    },
    /// Recount scripts per folder and repair cached counts
    Reconcile {
        /// Project ID
        id: String,
    },
}

/// Project display row
#[derive(Debug, Serialize, Tabled)]
struct ProjectRow {
    /// Project ID
    id: String,
    /// Title
    title: String,
    /// Folder count
    folders: usize,
    /// Script count
    scripts: u64,
    /// Last update
    updated_at: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.to_string(),
            title: p.title.clone(),
            folders: scripthub_service::FolderTree::count(&p.folders),
            scripts: p.stats.total_scripts,
            updated_at: output::short_time(&p.updated_at),
        }
    }
}

/// Execute project commands
pub async fn execute(
    args: &ProjectArgs,
    services: &AppServices,
    format: OutputFormat,
) -> AppResult<()> {
    let projects = &services.projects;

    match &args.command {
        ProjectCommand::Create {
            owner,
            title,
            description,
        } => {
            let project = projects
                .create_project(CreateProject {
                    owner_id: parse_id::<UserId>("owner id", owner)?,
                    title: title.clone(),
                    description: description.clone(),
                    settings: Default::default(),
                })
                .await?;
            output::print_success(&format!("Project '{}' created (id: {})", project.title, project.id));
        }
        ProjectCommand::List {
            owner,
            search,
            page,
            size,
        } => {
            let owner_id = parse_id::<UserId>("owner id", owner)?;
            let page = PageRequest::new(*page, *size);
            let result = match search {
                Some(needle) => projects.search(owner_id, needle, page).await?,
                None => projects.list_by_owner(owner_id, page).await?,
            };
            let rows: Vec<ProjectRow> = result.items.iter().map(ProjectRow::from).collect();
            output::print_list(&rows, format);
            if result.has_next {
                output::print_kv("More", &format!("page {} of {}", result.page, result.total_pages));
            }
        }
        ProjectCommand::Show { id } => {
            let project = projects.get_project(parse_id::<ProjectId>("project id", id)?).await?;
            output::print_item(
                &project,
                &[
                    ("ID", project.id.to_string()),
                    ("Owner", project.owner_id.to_string()),
                    ("Title", project.title.clone()),
                    ("Description", project.description.clone()),
                    ("Visibility", format!("{:?}", project.settings.visibility)),
                    ("Folders", scripthub_service::FolderTree::count(&project.folders).to_string()),
                    ("Scripts", project.stats.total_scripts.to_string()),
                    ("Created", output::short_time(&project.created_at)),
                    ("Updated", output::short_time(&project.updated_at)),
                ],
                format,
            );
        }
        ProjectCommand::Update {
            id,
            title,
            description,
        } => {
            let project = projects
                .update_project(
                    parse_id::<ProjectId>("project id", id)?,
                    UpdateProject {
                        title: title.clone(),
                        description: description.clone(),
                        settings: None,
                    },
                )
                .await?;
            output::print_success(&format!("Project '{}' updated", project.title));
        }
        ProjectCommand::Delete { id } => {
            let removed = projects
                .delete_project(parse_id::<ProjectId>("project id", id)?)
                .await?;
            output::print_success(&format!("Project deleted ({removed} scripts removed)"));
        }
        ProjectCommand::Reconcile { id } => {
            let report = projects
                .reconcile_script_counts(parse_id::<ProjectId>("project id", id)?)
                .await?;
            if report.is_clean() {
                output::print_success("Script counts are consistent");
            }
            for drift in &report.drift {
                output::print_warning(&format!(
                    "Folder {}: cached {} scripts, found {}",
                    drift.folder_id, drift.cached, drift.actual
                ));
            }
            if !report.orphaned_scripts.is_empty() {
                output::print_warning(&format!(
                    "{} scripts reference folders that no longer exist",
                    report.orphaned_scripts.len()
                ));
            }
            output::print_kv("Total scripts", &report.project.stats.total_scripts.to_string());
        }
    }

    Ok(())
}
