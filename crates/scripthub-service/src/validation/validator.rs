//! Field and document validation driven by configured limits.

use scripthub_core::config::limits::LimitsConfig;
use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_entity::folder::FolderNode;
use scripthub_entity::project::Project;
use scripthub_entity::script::{Script, ScriptVersion};

use super::hierarchy::check_hierarchy;

/// Validates folders, projects, and scripts against [`LimitsConfig`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: LimitsConfig,
}

fn bounded(field: &str, value: &str, max: usize, allow_empty: bool) -> AppResult<()> {
    if !allow_empty && value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} cannot be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(AppError::validation(format!(
            "{field} is {len} characters, the limit is {max}"
        )));
    }
    Ok(())
}

impl Validator {
    /// Create a validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// The limits in force.
    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Folder names are non-empty and bounded.
    pub fn folder_name(&self, name: &str) -> AppResult<()> {
        bounded("Folder name", name, self.limits.max_folder_name_len, false)
    }

    /// Project and script titles are non-empty and bounded.
    pub fn title(&self, title: &str) -> AppResult<()> {
        bounded("Title", title, self.limits.max_title_len, false)
    }

    /// Project descriptions may be empty but are bounded.
    pub fn description(&self, description: &str) -> AppResult<()> {
        bounded(
            "Description",
            description,
            self.limits.max_description_len,
            true,
        )
    }

    /// Script content may be empty but is bounded.
    pub fn content(&self, content: &str) -> AppResult<()> {
        bounded("Content", content, self.limits.max_content_len, true)
    }

    /// Full forest check: shape, then every name and the nesting depth.
    pub fn forest(&self, forest: &[FolderNode]) -> AppResult<()> {
        check_hierarchy(forest)?;
        self.forest_fields(forest, 1)
    }

    fn forest_fields(&self, nodes: &[FolderNode], depth: usize) -> AppResult<()> {
        for node in nodes {
            if depth > self.limits.max_folder_depth {
                return Err(AppError::validation(format!(
                    "Folder {} is nested {depth} levels deep, the limit is {}",
                    node.id, self.limits.max_folder_depth
                )));
            }
            self.folder_name(&node.name)?;
            self.forest_fields(&node.children, depth + 1)?;
        }
        Ok(())
    }

    /// Version numbers start at 1 and strictly increase in stored order.
    pub fn versions(&self, versions: &[ScriptVersion]) -> AppResult<()> {
        let mut previous = 0u32;
        for version in versions {
            if version.version == 0 {
                return Err(AppError::validation("Version numbers start at 1"));
            }
            if version.version == previous {
                return Err(AppError::validation(format!(
                    "Duplicate version number {}",
                    version.version
                )));
            }
            if version.version < previous {
                return Err(AppError::validation(format!(
                    "Version {} recorded after version {previous}",
                    version.version
                )));
            }
            self.content(&version.content)?;
            previous = version.version;
        }
        Ok(())
    }

    /// Everything a project document must satisfy before it is written.
    pub fn project(&self, project: &Project) -> AppResult<()> {
        self.title(&project.title)?;
        self.description(&project.description)?;
        self.forest(&project.folders)
    }

    /// Everything a script document must satisfy before it is written.
    pub fn script(&self, script: &Script) -> AppResult<()> {
        self.title(&script.title)?;
        self.content(&script.content)?;
        if script.versions.is_empty() {
            return Err(AppError::validation("A script needs at least one version"));
        }
        self.versions(&script.versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scripthub_core::error::ErrorKind;
    use scripthub_core::types::FolderId;
    use uuid::Uuid;

    fn small_limits() -> LimitsConfig {
        LimitsConfig {
            max_folder_name_len: 5,
            max_title_len: 10,
            max_description_len: 20,
            max_content_len: 8,
            max_folder_depth: 2,
        }
    }

    fn v(n: u32) -> ScriptVersion {
        ScriptVersion::new(n, "x", Utc::now())
    }

    #[test]
    fn test_folder_name_bounds() {
        let validator = Validator::new(small_limits());
        assert!(validator.folder_name("Intro").is_ok());
        assert_eq!(
            validator.folder_name("   ").unwrap_err().kind,
            ErrorKind::Validation
        );
        assert!(validator.folder_name("Outros").is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        let validator = Validator::new(small_limits());
        assert!(validator.folder_name("ñañaa").is_ok());
    }

    #[test]
    fn test_versions_must_increase() {
        let validator = Validator::default();
        assert!(validator.versions(&[v(1), v(2), v(5)]).is_ok());
        assert!(validator.versions(&[v(1), v(1)]).unwrap_err().message.contains("Duplicate"));
        assert!(validator.versions(&[v(2), v(1)]).is_err());
        assert!(validator.versions(&[v(0)]).is_err());
    }

    #[test]
    fn test_forest_depth_limit() {
        let validator = Validator::new(small_limits());
        let a = FolderId::from_uuid(Uuid::new_v4());
        let b = FolderId::from_uuid(Uuid::new_v4());
        let c = FolderId::from_uuid(Uuid::new_v4());
        let mut leaf_parent = FolderNode::new(b, "b", Some(a), Utc::now());
        leaf_parent.children.push(FolderNode::new(c, "c", Some(b), Utc::now()));
        let mut root = FolderNode::new(a, "a", None, Utc::now());
        root.children.push(leaf_parent);

        let err = validator.forest(&[root]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("nested 3 levels"));
    }
}
