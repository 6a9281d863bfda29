//! Folder node embedded in a project document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scripthub_core::types::FolderId;

/// A folder in a project's folder forest.
///
/// Nodes own their children directly. A node without descendants may
/// serialize without a `children` field; both forms are equivalent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    /// Folder identifier, unique within the owning project.
    pub id: FolderId,
    /// Display name.
    pub name: String,
    /// Parent folder (None for roots).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    /// Child folders in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FolderNode>,
    /// Cached number of scripts that reference this folder.
    #[serde(default)]
    pub script_count: u64,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

impl FolderNode {
    /// Create a childless folder with a zero script count.
    pub fn new(
        id: FolderId,
        name: impl Into<String>,
        parent_id: Option<FolderId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
            children: Vec::new(),
            script_count: 0,
            created_at,
        }
    }

    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this folder has child folders.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder (None for a new root).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

/// Mutable folder fields. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderPatch {
    /// New folder name.
    #[serde(default)]
    pub name: Option<String>,
}

impl FolderPatch {
    /// A patch that renames the folder.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}
