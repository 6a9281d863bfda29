//! Append-only script version history.
//!
//! Content only changes by appending a version. Reverting copies an old
//! version's content forward as a new version; history is never truncated.

use chrono::{DateTime, Utc};

use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::types::ScriptId;
use scripthub_entity::script::{CreateScript, MetadataPatch, Script, ScriptVersion};

/// Pure version-history operations on [`Script`] values.
#[derive(Debug, Clone, Copy)]
pub struct VersionedScript;

impl VersionedScript {
    /// Build a new script. Its history is `[v1 = content]` unless the input
    /// carries a non-empty `versions` sequence, which is kept verbatim.
    pub fn create_with_initial_version(
        input: CreateScript,
        id: ScriptId,
        now: DateTime<Utc>,
    ) -> Script {
        let versions = if input.versions.is_empty() {
            vec![ScriptVersion::new(1, input.content.clone(), now)]
        } else {
            input.versions
        };

        Script {
            id,
            owner_id: input.owner_id,
            project_id: input.project_id,
            folder_id: input.folder_id,
            title: input.title,
            content: input.content,
            metadata: input.metadata,
            versions,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set new content and record it as version `max + 1`.
    pub fn append_version(
        script: &Script,
        content: impl Into<String>,
        metadata: Option<MetadataPatch>,
        now: DateTime<Utc>,
    ) -> AppResult<Script> {
        let next = script.latest_version().checked_add(1).ok_or_else(|| {
            AppError::validation(format!("Script {} has exhausted version numbers", script.id))
        })?;
        let content = content.into();

        let mut updated = script.clone();
        updated
            .versions
            .push(ScriptVersion::new(next, content.clone(), now));
        updated.content = content;
        if let Some(patch) = metadata {
            updated.metadata.apply(patch);
        }
        updated.updated_at = now;
        Ok(updated)
    }

    /// Append a new version carrying `target`'s content.
    pub fn revert_to_version(script: &Script, target: u32, now: DateTime<Utc>) -> AppResult<Script> {
        let content = Self::get_version(script, target)?.content.clone();
        Self::append_version(script, content, None, now)
    }

    /// The history, most recent first.
    pub fn version_history(script: &Script) -> Vec<ScriptVersion> {
        let mut versions = script.versions.clone();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        versions
    }

    /// A single recorded version.
    pub fn get_version(script: &Script, version: u32) -> AppResult<&ScriptVersion> {
        script
            .versions
            .iter()
            .find(|v| v.version == version)
            .ok_or_else(|| {
                AppError::version_not_found(format!(
                    "Script {} has no version {version}",
                    script.id
                ))
            })
    }
}
