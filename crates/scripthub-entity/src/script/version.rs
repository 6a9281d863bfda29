//! Script version snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable snapshot of a script's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptVersion {
    /// Version number, starting at 1 and strictly increasing.
    pub version: u32,
    /// The content at this version.
    pub content: String,
    /// When this version was recorded.
    pub created_at: DateTime<Utc>,
}

impl ScriptVersion {
    /// Create a version snapshot.
    pub fn new(version: u32, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            version,
            content: content.into(),
            created_at,
        }
    }
}
