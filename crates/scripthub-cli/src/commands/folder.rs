//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use scripthub_core::result::AppResult;
use scripthub_core::types::{FolderId, ProjectId};
use scripthub_entity::folder::{CreateFolder, FolderPatch};
use scripthub_service::{DeletePolicy, FolderTree};

use super::{AppServices, parse_id};
use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Show a project's folder tree
    Tree {
        /// Project ID
        #[arg(short, long)]
        project: String,
    },
    /// Create a new folder
    Create {
        /// Project ID
        #[arg(short, long)]
        project: String,
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Rename a folder
    Rename {
        /// Project ID
        #[arg(short, long)]
        project: String,
        /// Folder ID
        folder: String,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Move a folder under another parent
    Move {
        /// Project ID
        #[arg(short, long)]
        project: String,
        /// Folder ID
        folder: String,
        /// New parent folder ID (omit to make it a root)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Delete a folder and its subfolders
    Delete {
        /// Project ID
        #[arg(short, long)]
        project: String,
        /// Folder ID
        folder: String,
        /// Move affected scripts here instead of deleting them
        #[arg(long)]
        reassign_to: Option<String>,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name, indented by depth
    name: String,
    /// Path from the root
    path: String,
    /// Cached script count
    scripts: u64,
    /// Created at
    created_at: String,
}

fn parse_parent(parent: &Option<String>) -> AppResult<Option<FolderId>> {
    parent
        .as_deref()
        .map(|raw| parse_id::<FolderId>("parent folder id", raw))
        .transpose()
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    services: &AppServices,
    format: OutputFormat,
) -> AppResult<()> {
    let folders = &services.folders;

    match &args.command {
        FolderCommand::Tree { project } => {
            let forest = folders
                .get_tree(parse_id::<ProjectId>("project id", project)?)
                .await?;
            let rows: Vec<FolderRow> = FolderTree::flatten(&forest)
                .into_iter()
                .map(|(depth, node)| {
                    let path = FolderTree::path_to(&forest, node.id)
                        .unwrap_or_default()
                        .iter()
                        .map(|n| n.name.as_str())
                        .collect::<Vec<_>>()
                        .join("/");
                    FolderRow {
                        id: node.id.to_string(),
                        name: format!("{}{}", "  ".repeat(depth), node.name),
                        path: format!("/{path}"),
                        scripts: node.script_count,
                        created_at: output::short_time(&node.created_at),
                    }
                })
                .collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Create {
            project,
            name,
            parent,
        } => {
            let (_, folder) = folders
                .create_folder(
                    parse_id::<ProjectId>("project id", project)?,
                    CreateFolder {
                        name: name.clone(),
                        parent_id: parse_parent(parent)?,
                    },
                )
                .await?;
            output::print_success(&format!("Folder '{}' created (id: {})", folder.name, folder.id));
        }
        FolderCommand::Rename {
            project,
            folder,
            name,
        } => {
            folders
                .rename_folder(
                    parse_id::<ProjectId>("project id", project)?,
                    parse_id::<FolderId>("folder id", folder)?,
                    FolderPatch::rename(name.clone()),
                )
                .await?;
            output::print_success(&format!("Folder renamed to '{name}'"));
        }
        FolderCommand::Move {
            project,
            folder,
            parent,
        } => {
            folders
                .move_folder(
                    parse_id::<ProjectId>("project id", project)?,
                    parse_id::<FolderId>("folder id", folder)?,
                    parse_parent(parent)?,
                )
                .await?;
            output::print_success("Folder moved");
        }
        FolderCommand::Delete {
            project,
            folder,
            reassign_to,
        } => {
            let policy = match reassign_to {
                Some(target) => {
                    DeletePolicy::ReassignTo(parse_id::<FolderId>("target folder id", target)?)
                }
                None => DeletePolicy::CascadeDelete,
            };
            let deletion = folders
                .delete_folder(
                    parse_id::<ProjectId>("project id", project)?,
                    parse_id::<FolderId>("folder id", folder)?,
                    policy,
                )
                .await?;
            output::print_success(&format!(
                "Removed {} folders ({} scripts deleted, {} reassigned)",
                deletion.removed_folders.len(),
                deletion.scripts_deleted,
                deletion.scripts_reassigned
            ));
        }
    }

    Ok(())
}
