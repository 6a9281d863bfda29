//! Script CLI commands: editing, history, and filing.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use scripthub_core::result::AppResult;
use scripthub_core::types::{FolderId, PageRequest, ProjectId, ScriptId, UserId};
use scripthub_entity::script::{CreateScript, MetadataPatch, Script, ScriptMetadata, ScriptStatus};
use scripthub_service::script::UpdateScriptDetails;

use super::{AppServices, parse_id, read_content};
use crate::output::{self, OutputFormat};

/// Arguments for script commands
#[derive(Debug, Args)]
pub struct ScriptArgs {
    /// Script subcommand
    #[command(subcommand)]
    pub command: ScriptCommand,
}

/// Script subcommands
#[derive(Debug, Subcommand)]
pub enum ScriptCommand {
    /// Create a script in a folder
    Create {
        /// Project ID
        #[arg(short, long)]
        project: String,
        /// Folder ID
        #[arg(long)]
        folder: String,
        /// Owning user ID
        #[arg(short, long)]
        owner: String,
        /// Title
        #[arg(short, long)]
        title: String,
        /// Initial content
        #[arg(short, long)]
        content: Option<String>,
        /// Read the initial content from a file
        #[arg(long)]
        file: Option<String>,
    },
    /// List scripts in a project or folder
    List {
        /// Project ID
        #[arg(short, long)]
        project: String,
        /// Only this folder
        #[arg(long)]
        folder: Option<String>,
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
    /// Show a script
    Show {
        /// Script ID
        id: String,
        /// Show this version's content instead of the current one
        #[arg(short, long)]
        version: Option<u32>,
    },
    /// Record new content as a new version
    Edit {
        /// Script ID
        id: String,
        /// New content
        #[arg(short, long)]
        content: Option<String>,
        /// Read the new content from a file
        #[arg(long)]
        file: Option<String>,
        /// New status (draft, in_review, ready, recorded, published)
        #[arg(long)]
        status: Option<String>,
    },
    /// Change the title without recording a version
    Retitle {
        /// Script ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: String,
    },
    /// Copy an old version forward as the newest version
    Revert {
        /// Script ID
        id: String,
        /// Version to restore
        #[arg(short, long)]
        version: u32,
    },
    /// Show version history, newest first
    History {
        /// Script ID
        id: String,
    },
    /// File a script under another folder
    Move {
        /// Script ID
        id: String,
        /// Target folder ID
        #[arg(long)]
        folder: String,
    },
    /// Delete a script
    Delete {
        /// Script ID
        id: String,
    },
}

/// Script display row
#[derive(Debug, Serialize, Tabled)]
struct ScriptRow {
    /// Script ID
    id: String,
    /// Title
    title: String,
    /// Status
    status: String,
    /// Latest version number
    version: u32,
    /// Last update
    updated_at: String,
}

impl From<&Script> for ScriptRow {
    fn from(s: &Script) -> Self {
        Self {
            id: s.id.to_string(),
            title: s.title.clone(),
            status: format!("{:?}", s.metadata.status),
            version: s.latest_version(),
            updated_at: output::short_time(&s.updated_at),
        }
    }
}

/// Version display row
#[derive(Debug, Serialize, Tabled)]
struct VersionRow {
    /// Version number
    version: u32,
    /// Content length in characters
    chars: usize,
    /// First line of the content
    preview: String,
    /// Recorded at
    created_at: String,
}

fn parse_status(raw: &Option<String>) -> AppResult<Option<ScriptStatus>> {
    raw.as_deref()
        .map(|s| {
            ScriptStatus::parse(s).ok_or_else(|| {
                scripthub_core::error::AppError::validation(format!("Unknown status '{s}'"))
            })
        })
        .transpose()
}

/// Execute script commands
pub async fn execute(
    args: &ScriptArgs,
    services: &AppServices,
    format: OutputFormat,
) -> AppResult<()> {
    let scripts = &services.scripts;

    match &args.command {
        ScriptCommand::Create {
            project,
            folder,
            owner,
            title,
            content,
            file,
        } => {
            let script = scripts
                .create_script(CreateScript {
                    owner_id: parse_id::<UserId>("owner id", owner)?,
                    project_id: parse_id::<ProjectId>("project id", project)?,
                    folder_id: parse_id::<FolderId>("folder id", folder)?,
                    title: title.clone(),
                    content: read_content(content, file).await?,
                    metadata: ScriptMetadata::default(),
                    versions: Vec::new(),
                })
                .await?;
            output::print_success(&format!("Script '{}' created (id: {})", script.title, script.id));
        }
        ScriptCommand::List {
            project,
            folder,
            search,
            page,
            size,
        } => {
            let project_id = parse_id::<ProjectId>("project id", project)?;
            let page = PageRequest::new(*page, *size);
            let result = match (folder, search) {
                (Some(folder), _) => {
                    scripts
                        .list_folder(project_id, parse_id::<FolderId>("folder id", folder)?, page)
                        .await?
                }
                (None, Some(needle)) => scripts.search(project_id, needle, page).await?,
                (None, None) => scripts.list_project(project_id, page).await?,
            };
            let rows: Vec<ScriptRow> = result.items.iter().map(ScriptRow::from).collect();
            output::print_list(&rows, format);
        }
        ScriptCommand::Show { id, version } => {
            let script_id = parse_id::<ScriptId>("script id", id)?;
            match version {
                Some(n) => {
                    let v = scripts.get_version(script_id, *n).await?;
                    output::print_item(
                        &v,
                        &[
                            ("Version", v.version.to_string()),
                            ("Recorded", output::short_time(&v.created_at)),
                            ("Content", v.content.clone()),
                        ],
                        format,
                    );
                }
                None => {
                    let script = scripts.get_script(script_id).await?;
                    output::print_item(
                        &script,
                        &[
                            ("ID", script.id.to_string()),
                            ("Title", script.title.clone()),
                            ("Project", script.project_id.to_string()),
                            ("Folder", script.folder_id.to_string()),
                            ("Status", format!("{:?}", script.metadata.status)),
                            ("Version", script.latest_version().to_string()),
                            ("Updated", output::short_time(&script.updated_at)),
                            ("Content", script.content.clone()),
                        ],
                        format,
                    );
                }
            }
        }
        ScriptCommand::Edit {
            id,
            content,
            file,
            status,
        } => {
            let patch = parse_status(status)?.map(|status| MetadataPatch {
                status: Some(status),
                ..Default::default()
            });
            let script = scripts
                .update_content(
                    parse_id::<ScriptId>("script id", id)?,
                    &read_content(content, file).await?,
                    patch,
                )
                .await?;
            output::print_success(&format!("Recorded version {}", script.latest_version()));
        }
        ScriptCommand::Retitle { id, title } => {
            let script = scripts
                .update_details(
                    parse_id::<ScriptId>("script id", id)?,
                    UpdateScriptDetails {
                        title: Some(title.clone()),
                        metadata: None,
                    },
                )
                .await?;
            output::print_success(&format!("Script retitled to '{}'", script.title));
        }
        ScriptCommand::Revert { id, version } => {
            let script = scripts
                .revert(parse_id::<ScriptId>("script id", id)?, *version)
                .await?;
            output::print_success(&format!(
                "Version {version} restored as version {}",
                script.latest_version()
            ));
        }
        ScriptCommand::History { id } => {
            let history = scripts.history(parse_id::<ScriptId>("script id", id)?).await?;
            let rows: Vec<VersionRow> = history
                .iter()
                .map(|v| VersionRow {
                    version: v.version,
                    chars: v.content.chars().count(),
                    preview: v.content.lines().next().unwrap_or_default().chars().take(48).collect(),
                    created_at: output::short_time(&v.created_at),
                })
                .collect();
            output::print_list(&rows, format);
        }
        ScriptCommand::Move { id, folder } => {
            let script = scripts
                .move_script(
                    parse_id::<ScriptId>("script id", id)?,
                    parse_id::<FolderId>("folder id", folder)?,
                )
                .await?;
            output::print_success(&format!("Script moved to folder {}", script.folder_id));
        }
        ScriptCommand::Delete { id } => {
            if scripts.delete_script(parse_id::<ScriptId>("script id", id)?).await? {
                output::print_success("Script deleted");
            } else {
                output::print_warning("Script not found, nothing deleted");
            }
        }
    }

    Ok(())
}
