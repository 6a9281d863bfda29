//! Project document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scripthub_core::types::{ProjectId, UserId};

use super::settings::ProjectSettings;
use crate::folder::FolderNode;

/// Derived project statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    /// Sum of every folder's `scriptCount`.
    #[serde(default)]
    pub total_scripts: u64,
}

/// A project document with its embedded folder forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// The owning user. Never changes.
    pub owner_id: UserId,
    /// Project title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Root folders, each owning its descendants.
    #[serde(default)]
    pub folders: Vec<FolderNode>,
    /// Visibility and collaboration flags.
    #[serde(default)]
    pub settings: ProjectSettings,
    /// Cached statistics.
    #[serde(default)]
    pub stats: ProjectStats,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the folders or settings last changed.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    /// The owning user.
    pub owner_id: UserId,
    /// Project title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Initial settings.
    #[serde(default)]
    pub settings: ProjectSettings,
}

/// Editable project fields. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement settings.
    #[serde(default)]
    pub settings: Option<ProjectSettings>,
}

impl UpdateProject {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.settings.is_none()
    }
}
