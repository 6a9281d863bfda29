//! Project visibility and collaboration flags.

use serde::{Deserialize, Serialize};

/// Who may see a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only the owner.
    #[default]
    Private,
    /// Invited collaborators.
    Team,
    /// Anyone with the link.
    Public,
}

/// Project-level flags. Opaque to the folder and versioning logic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    /// Project visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Whether collaborators may edit scripts.
    #[serde(default)]
    pub allow_collaboration: bool,
}
