//! Field-length and hierarchy limits.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Limits enforced by the validator before anything is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LimitsConfig {
    /// Maximum folder name length in characters.
    #[serde(default = "default_max_folder_name_len")]
    #[validate(range(min = 1))]
    pub max_folder_name_len: usize,
    /// Maximum project or script title length in characters.
    #[serde(default = "default_max_title_len")]
    #[validate(range(min = 1))]
    pub max_title_len: usize,
    /// Maximum project description length in characters.
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,
    /// Maximum script content length in characters.
    #[serde(default = "default_max_content_len")]
    #[validate(range(min = 1))]
    pub max_content_len: usize,
    /// Maximum folder nesting depth (roots are depth 1).
    #[serde(default = "default_max_folder_depth")]
    #[validate(range(min = 1))]
    pub max_folder_depth: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_folder_name_len: default_max_folder_name_len(),
            max_title_len: default_max_title_len(),
            max_description_len: default_max_description_len(),
            max_content_len: default_max_content_len(),
            max_folder_depth: default_max_folder_depth(),
        }
    }
}

fn default_max_folder_name_len() -> usize {
    100
}

fn default_max_title_len() -> usize {
    200
}

fn default_max_description_len() -> usize {
    2000
}

fn default_max_content_len() -> usize {
    1_000_000
}

fn default_max_folder_depth() -> usize {
    32
}
