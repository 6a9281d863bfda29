//! Script metadata and its field-by-field patch.

use serde::{Deserialize, Serialize};

/// The kind of video a script is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Long-form video.
    #[default]
    LongForm,
    /// Short vertical video.
    Short,
    /// Live stream run-sheet.
    Livestream,
    /// Audio or video podcast episode.
    Podcast,
}

/// Production status of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStatus {
    /// Being written.
    #[default]
    Draft,
    /// Waiting on review.
    InReview,
    /// Ready to record.
    Ready,
    /// Footage recorded.
    Recorded,
    /// Video published.
    Published,
}

impl ScriptStatus {
    /// Parse the snake_case name used in documents and on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "in_review" => Some(Self::InReview),
            "ready" => Some(Self::Ready),
            "recorded" => Some(Self::Recorded),
            "published" => Some(Self::Published),
            _ => None,
        }
    }
}

/// Descriptive script metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptMetadata {
    /// The kind of video.
    #[serde(default)]
    pub content_type: ContentType,
    /// Target duration in seconds.
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Production status.
    #[serde(default)]
    pub status: ScriptStatus,
}

impl ScriptMetadata {
    /// Merge a patch into this metadata, field by field.
    pub fn apply(&mut self, patch: MetadataPatch) {
        if let Some(content_type) = patch.content_type {
            self.content_type = content_type;
        }
        if let Some(duration) = patch.duration_seconds {
            self.duration_seconds = duration;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Partial metadata update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPatch {
    /// New content type.
    #[serde(default)]
    pub content_type: Option<ContentType>,
    /// New duration; `Some(None)` clears it.
    #[serde(default)]
    pub duration_seconds: Option<Option<u32>>,
    /// Replacement tag list.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// New status.
    #[serde(default)]
    pub status: Option<ScriptStatus>,
}
