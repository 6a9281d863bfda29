//! Document store maintenance commands.

use clap::{Args, Subcommand};

use scripthub_core::result::AppResult;
use scripthub_core::traits::DocumentStore;
use scripthub_store::repositories::{PROJECTS, SCRIPTS};

use super::AppServices;
use crate::output::{self, OutputFormat};

/// Arguments for store commands
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Store subcommand
    #[command(subcommand)]
    pub command: StoreCommand,
}

/// Store subcommands
#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    /// Check that the store is reachable
    Health,
    /// Count documents per collection
    Stats,
}

/// Execute store commands
pub async fn execute(
    args: &StoreArgs,
    services: &AppServices,
    _format: OutputFormat,
) -> AppResult<()> {
    let store = services.store.as_ref();

    match &args.command {
        StoreCommand::Health => {
            if store.health_check().await? {
                output::print_success("Store is healthy");
            } else {
                output::print_warning("Store responded but reported unhealthy");
            }
        }
        StoreCommand::Stats => {
            for collection in [PROJECTS, SCRIPTS] {
                let count = store.count(collection, &[]).await?;
                output::print_kv(collection, &count.to_string());
            }
        }
    }

    Ok(())
}
