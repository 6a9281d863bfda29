//! Script document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scripthub_core::types::{FolderId, ProjectId, ScriptId, UserId};

use super::metadata::ScriptMetadata;
use super::version::ScriptVersion;

/// A script document with its append-only version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Unique script identifier.
    pub id: ScriptId,
    /// The owning user.
    pub owner_id: UserId,
    /// The project this script belongs to.
    pub project_id: ProjectId,
    /// The folder (within the project) this script is filed under.
    pub folder_id: FolderId,
    /// Script title.
    pub title: String,
    /// Current canonical text.
    pub content: String,
    /// Descriptive metadata.
    #[serde(default)]
    pub metadata: ScriptMetadata,
    /// Every version the script has held, oldest first.
    #[serde(default)]
    pub versions: Vec<ScriptVersion>,
    /// When the script was created.
    pub created_at: DateTime<Utc>,
    /// When the script was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Script {
    /// The highest version number recorded, or 0 for an empty history.
    pub fn latest_version(&self) -> u32 {
        self.versions.iter().map(|v| v.version).max().unwrap_or(0)
    }
}

/// Data required to create a new script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScript {
    /// The owning user.
    pub owner_id: UserId,
    /// The owning project.
    pub project_id: ProjectId,
    /// The folder to file the script under.
    pub folder_id: FolderId,
    /// Script title.
    pub title: String,
    /// Initial content.
    #[serde(default)]
    pub content: String,
    /// Initial metadata.
    #[serde(default)]
    pub metadata: ScriptMetadata,
    /// Imported history. When non-empty it is used verbatim.
    #[serde(default)]
    pub versions: Vec<ScriptVersion>,
}
