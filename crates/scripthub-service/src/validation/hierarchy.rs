//! Folder forest shape checks.

use std::collections::HashSet;

use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::types::FolderId;
use scripthub_entity::folder::FolderNode;

/// Verify that the forest is acyclic, that folder ids are unique, and that
/// every node's `parent_id` names the node that actually contains it.
pub fn check_hierarchy(forest: &[FolderNode]) -> AppResult<()> {
    let mut seen = HashSet::new();
    let mut ancestors = Vec::new();
    check_level(forest, None, &mut ancestors, &mut seen)
}

fn check_level(
    nodes: &[FolderNode],
    container: Option<FolderId>,
    ancestors: &mut Vec<FolderId>,
    seen: &mut HashSet<FolderId>,
) -> AppResult<()> {
    for node in nodes {
        if ancestors.contains(&node.id) {
            return Err(AppError::invalid_hierarchy(format!(
                "Folder {} would become its own ancestor",
                node.id
            )));
        }
        if !seen.insert(node.id) {
            return Err(AppError::invalid_hierarchy(format!(
                "Duplicate folder id {}",
                node.id
            )));
        }
        if node.parent_id != container {
            return Err(AppError::invalid_hierarchy(format!(
                "Folder {} names parent {:?} but is nested under {:?}",
                node.id,
                node.parent_id.map(|id| id.to_string()),
                container.map(|id| id.to_string())
            )));
        }

        ancestors.push(node.id);
        check_level(&node.children, Some(node.id), ancestors, seen)?;
        ancestors.pop();
    }
    Ok(())
}
