//! Pure operations over a project's folder forest.
//!
//! Every mutator takes the current forest by reference and returns a new
//! forest; nothing is changed in place. Structural mutators re-run
//! [`check_hierarchy`] on their result so the acyclic/unique-id invariant
//! is enforced in one place. Traversal is depth-first pre-order in stored
//! child order.

use std::collections::HashMap;

use tracing::warn;

use scripthub_core::error::AppError;
use scripthub_core::result::AppResult;
use scripthub_core::types::FolderId;
use scripthub_entity::folder::{FolderNode, FolderPatch};

use crate::validation::check_hierarchy;

/// Hierarchy-aware folder forest operations.
#[derive(Debug, Clone, Copy)]
pub struct FolderTree;

fn not_found(id: FolderId) -> AppError {
    AppError::not_found(format!("Folder {id} not found"))
}

fn find_mut(nodes: &mut [FolderNode], id: FolderId) -> Option<&mut FolderNode> {
    nodes.iter_mut().find_map(|node| {
        if node.id == id {
            Some(node)
        } else {
            find_mut(&mut node.children, id)
        }
    })
}

fn detach(nodes: &mut Vec<FolderNode>, id: FolderId) -> Option<FolderNode> {
    if let Some(pos) = nodes.iter().position(|node| node.id == id) {
        return Some(nodes.remove(pos));
    }
    nodes
        .iter_mut()
        .find_map(|node| detach(&mut node.children, id))
}

fn collect_ids(node: &FolderNode, out: &mut Vec<FolderId>) {
    out.push(node.id);
    for child in &node.children {
        collect_ids(child, out);
    }
}

fn walk<'a>(nodes: &'a [FolderNode], depth: usize, out: &mut Vec<(usize, &'a FolderNode)>) {
    for node in nodes {
        out.push((depth, node));
        walk(&node.children, depth + 1, out);
    }
}

fn chain<'a>(nodes: &'a [FolderNode], id: FolderId, trail: &mut Vec<&'a FolderNode>) -> bool {
    for node in nodes {
        trail.push(node);
        if node.id == id || chain(&node.children, id, trail) {
            return true;
        }
        trail.pop();
    }
    false
}

impl FolderTree {
    /// Locate a folder anywhere in the forest.
    pub fn find_by_id(forest: &[FolderNode], id: FolderId) -> Option<&FolderNode> {
        forest.iter().find_map(|node| {
            if node.id == id {
                Some(node)
            } else {
                Self::find_by_id(&node.children, id)
            }
        })
    }

    /// Add `folder` as the last root (no parent) or as the last child of
    /// `parent_id`. The folder's own `parent_id` is set to match.
    pub fn insert(
        forest: &[FolderNode],
        mut folder: FolderNode,
        parent_id: Option<FolderId>,
    ) -> AppResult<Vec<FolderNode>> {
        let mut next = forest.to_vec();
        folder.parent_id = parent_id;

        match parent_id {
            None => next.push(folder),
            Some(parent_id) => {
                let parent = find_mut(&mut next, parent_id).ok_or_else(|| not_found(parent_id))?;
                parent.children.push(folder);
            }
        }

        check_hierarchy(&next)?;
        Ok(next)
    }

    /// Apply a patch to a folder's mutable fields.
    pub fn update(
        forest: &[FolderNode],
        id: FolderId,
        patch: &FolderPatch,
    ) -> AppResult<Vec<FolderNode>> {
        let mut next = forest.to_vec();
        let node = find_mut(&mut next, id).ok_or_else(|| not_found(id))?;
        if let Some(name) = &patch.name {
            node.name = name.clone();
        }
        Ok(next)
    }

    /// Remove a folder together with its whole subtree.
    ///
    /// Scripts filed under the removed folders are not touched here.
    pub fn remove(forest: &[FolderNode], id: FolderId) -> AppResult<Vec<FolderNode>> {
        let mut next = forest.to_vec();
        detach(&mut next, id).ok_or_else(|| not_found(id))?;
        Ok(next)
    }

    /// Re-home a folder (and its subtree) under `new_parent`, or make it a
    /// root when `new_parent` is `None`. It is appended after the new
    /// siblings.
    pub fn move_folder(
        forest: &[FolderNode],
        id: FolderId,
        new_parent: Option<FolderId>,
    ) -> AppResult<Vec<FolderNode>> {
        let subtree = Self::descendant_ids(forest, id).ok_or_else(|| not_found(id))?;

        if let Some(parent_id) = new_parent {
            if subtree.contains(&parent_id) {
                return Err(AppError::invalid_hierarchy(format!(
                    "Cannot move folder {id} into itself or one of its descendants"
                )));
            }
            if Self::find_by_id(forest, parent_id).is_none() {
                return Err(not_found(parent_id));
            }
        }

        let mut next = forest.to_vec();
        let node = detach(&mut next, id).ok_or_else(|| not_found(id))?;
        Self::insert(&next, node, new_parent)
    }

    /// Shift a folder's script count by `delta`, clamping at zero.
    pub fn adjust_script_count(
        forest: &[FolderNode],
        id: FolderId,
        delta: i64,
    ) -> AppResult<Vec<FolderNode>> {
        let mut next = forest.to_vec();
        let node = find_mut(&mut next, id).ok_or_else(|| not_found(id))?;

        node.script_count = if delta >= 0 {
            node.script_count.saturating_add(delta.unsigned_abs())
        } else {
            let magnitude = delta.unsigned_abs();
            if magnitude > node.script_count {
                warn!(
                    folder_id = %id,
                    script_count = node.script_count,
                    delta,
                    "Script count clamped at zero"
                );
            }
            node.script_count.saturating_sub(magnitude)
        };

        Ok(next)
    }

    /// Overwrite every folder's script count from `counts` (missing ids get 0).
    pub fn with_script_counts(
        forest: &[FolderNode],
        counts: &HashMap<FolderId, u64>,
    ) -> Vec<FolderNode> {
        forest
            .iter()
            .map(|node| FolderNode {
                script_count: counts.get(&node.id).copied().unwrap_or(0),
                children: Self::with_script_counts(&node.children, counts),
                ..node.clone()
            })
            .collect()
    }

    /// Sum of `script_count` over every folder.
    pub fn total_scripts(forest: &[FolderNode]) -> u64 {
        forest
            .iter()
            .map(|node| node.script_count + Self::total_scripts(&node.children))
            .sum()
    }

    /// Number of folders in the forest.
    pub fn count(forest: &[FolderNode]) -> usize {
        forest
            .iter()
            .map(|node| 1 + Self::count(&node.children))
            .sum()
    }

    /// The folder and every folder beneath it, pre-order.
    pub fn descendant_ids(forest: &[FolderNode], id: FolderId) -> Option<Vec<FolderId>> {
        let node = Self::find_by_id(forest, id)?;
        let mut out = Vec::new();
        collect_ids(node, &mut out);
        Some(out)
    }

    /// The chain of folders from a root down to `id` (inclusive).
    pub fn path_to(forest: &[FolderNode], id: FolderId) -> Option<Vec<&FolderNode>> {
        let mut trail = Vec::new();
        chain(forest, id, &mut trail).then_some(trail)
    }

    /// Every folder with its depth (roots are 0), pre-order.
    pub fn flatten(forest: &[FolderNode]) -> Vec<(usize, &FolderNode)> {
        let mut out = Vec::new();
        walk(forest, 0, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scripthub_core::error::ErrorKind;
    use uuid::Uuid;

    fn folder(name: &str) -> FolderNode {
        FolderNode::new(FolderId::from_uuid(Uuid::new_v4()), name, None, Utc::now())
    }

    /// A -> [B -> [D], C], E
    fn sample() -> (Vec<FolderNode>, [FolderId; 5]) {
        let (a, b, c, d, e) = (
            folder("A"),
            folder("B"),
            folder("C"),
            folder("D"),
            folder("E"),
        );
        let ids = [a.id, b.id, c.id, d.id, e.id];
        let forest = FolderTree::insert(&[], a, None).unwrap();
        let forest = FolderTree::insert(&forest, b, Some(ids[0])).unwrap();
        let forest = FolderTree::insert(&forest, c, Some(ids[0])).unwrap();
        let forest = FolderTree::insert(&forest, d, Some(ids[1])).unwrap();
        let forest = FolderTree::insert(&forest, e, None).unwrap();
        (forest, ids)
    }

    #[test]
    fn test_insert_root_into_empty() {
        let a = folder("A");
        let id = a.id;
        let forest = FolderTree::insert(&[], a, None).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, id);
        assert_eq!(forest[0].script_count, 0);
        assert!(forest[0].parent_id.is_none());
    }

    #[test]
    fn test_insert_child_sets_parent() {
        let (forest, [a, b, c, d, _]) = sample();
        let root = FolderTree::find_by_id(&forest, a).unwrap();
        let child_ids: Vec<_> = root.children.iter().map(|n| n.id).collect();
        assert_eq!(child_ids, vec![b, c]);
        assert_eq!(FolderTree::find_by_id(&forest, d).unwrap().parent_id, Some(b));
        assert_eq!(FolderTree::total_scripts(&forest), 0);
    }

    #[test]
    fn test_insert_missing_parent() {
        let (forest, _) = sample();
        let ghost = FolderId::from_uuid(Uuid::new_v4());
        let err = FolderTree::insert(&forest, folder("X"), Some(ghost)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_insert_duplicate_id_rejected() {
        let (forest, [a, ..]) = sample();
        let mut dup = folder("dup");
        dup.id = a;
        let err = FolderTree::insert(&forest, dup, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidHierarchy);
    }

    #[test]
    fn test_insert_leaves_input_untouched() {
        let (forest, [a, ..]) = sample();
        let before = forest.clone();
        let _ = FolderTree::insert(&forest, folder("new"), Some(a)).unwrap();
        assert_eq!(forest, before);
    }

    #[test]
    fn test_update_renames() {
        let (forest, [_, _, _, d, _]) = sample();
        let forest = FolderTree::update(&forest, d, &FolderPatch::rename("Drafts")).unwrap();
        assert_eq!(FolderTree::find_by_id(&forest, d).unwrap().name, "Drafts");

        let ghost = FolderId::from_uuid(Uuid::new_v4());
        assert_eq!(
            FolderTree::update(&forest, ghost, &FolderPatch::rename("x"))
                .unwrap_err()
                .kind,
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_remove_takes_subtree() {
        let (forest, [a, b, c, d, e]) = sample();
        let forest = FolderTree::remove(&forest, b).unwrap();
        assert!(FolderTree::find_by_id(&forest, b).is_none());
        assert!(FolderTree::find_by_id(&forest, d).is_none());
        assert!(FolderTree::find_by_id(&forest, c).is_some());
        assert_eq!(FolderTree::count(&forest), 3);

        let forest = FolderTree::remove(&forest, a).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, e);
    }

    #[test]
    fn test_remove_missing() {
        let (forest, [_, b, ..]) = sample();
        let forest = FolderTree::remove(&forest, b).unwrap();
        assert_eq!(
            FolderTree::remove(&forest, b).unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_adjust_script_count_clamps() {
        let (forest, [_, b, ..]) = sample();
        let forest = FolderTree::adjust_script_count(&forest, b, 2).unwrap();
        let forest = FolderTree::adjust_script_count(&forest, b, -5).unwrap();
        assert_eq!(FolderTree::find_by_id(&forest, b).unwrap().script_count, 0);
        let forest = FolderTree::adjust_script_count(&forest, b, 1).unwrap();
        assert_eq!(FolderTree::find_by_id(&forest, b).unwrap().script_count, 1);
    }

    #[test]
    fn test_adjust_sequences_never_negative() {
        let (mut forest, ids) = sample();
        let deltas = [3, -1, -7, 2, -2, 5, -1, -1, -9, 4, 0, -3];
        for (i, delta) in deltas.iter().enumerate() {
            let id = ids[i % ids.len()];
            forest = FolderTree::adjust_script_count(&forest, id, *delta).unwrap();
            let node = FolderTree::find_by_id(&forest, id).unwrap();
            assert!(node.script_count <= 9);
        }
        let expected: u64 = FolderTree::flatten(&forest)
            .iter()
            .map(|(_, n)| n.script_count)
            .sum();
        assert_eq!(FolderTree::total_scripts(&forest), expected);
    }

    #[test]
    fn test_total_scripts_recurses() {
        let (forest, [a, _, _, d, e]) = sample();
        let forest = FolderTree::adjust_script_count(&forest, a, 1).unwrap();
        let forest = FolderTree::adjust_script_count(&forest, d, 3).unwrap();
        let forest = FolderTree::adjust_script_count(&forest, e, 2).unwrap();
        assert_eq!(FolderTree::total_scripts(&forest), 6);
    }

    #[test]
    fn test_move_under_new_parent() {
        let (forest, [a, b, _, d, e]) = sample();
        let forest = FolderTree::move_folder(&forest, b, Some(e)).unwrap();
        let moved = FolderTree::find_by_id(&forest, b).unwrap();
        assert_eq!(moved.parent_id, Some(e));
        assert_eq!(moved.children[0].id, d);
        assert_eq!(FolderTree::find_by_id(&forest, a).unwrap().children.len(), 1);
    }

    #[test]
    fn test_move_to_root() {
        let (forest, [_, _, _, d, _]) = sample();
        let forest = FolderTree::move_folder(&forest, d, None).unwrap();
        assert_eq!(forest.len(), 3);
        assert_eq!(forest[2].id, d);
        assert!(forest[2].is_root());
    }

    #[test]
    fn test_move_into_descendant_rejected() {
        let (forest, [a, b, _, d, _]) = sample();
        for target in [a, b, d] {
            let err = FolderTree::move_folder(&forest, a, Some(target)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidHierarchy);
        }
        let err = FolderTree::move_folder(&forest, b, Some(b)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidHierarchy);
    }

    #[test]
    fn test_path_and_descendants() {
        let (forest, [a, b, c, d, e]) = sample();
        let path: Vec<_> = FolderTree::path_to(&forest, d)
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(path, vec![a, b, d]);
        assert_eq!(FolderTree::descendant_ids(&forest, a).unwrap(), vec![a, b, d, c]);
        assert_eq!(FolderTree::descendant_ids(&forest, e).unwrap(), vec![e]);
        assert!(FolderTree::path_to(&forest, FolderId::from_uuid(Uuid::new_v4())).is_none());
    }

    #[test]
    fn test_flatten_is_preorder_with_depth() {
        let (forest, [a, b, c, d, e]) = sample();
        let flat: Vec<_> = FolderTree::flatten(&forest)
            .into_iter()
            .map(|(depth, n)| (depth, n.id))
            .collect();
        assert_eq!(flat, vec![(0, a), (1, b), (2, d), (1, c), (0, e)]);
    }

    #[test]
    fn test_mutation_sequences_keep_invariants() {
        let (mut forest, [a, b, c, d, e]) = sample();
        let steps: Vec<Box<dyn Fn(&[FolderNode]) -> AppResult<Vec<FolderNode>>>> = vec![
            Box::new(move |f: &[FolderNode]| FolderTree::move_folder(f, c, Some(d))),
            Box::new(move |f: &[FolderNode]| FolderTree::update(f, a, &FolderPatch::rename("Renamed"))),
            Box::new(move |f: &[FolderNode]| FolderTree::move_folder(f, e, Some(c))),
            Box::new(move |f: &[FolderNode]| FolderTree::move_folder(f, a, Some(e))),
            Box::new(|f: &[FolderNode]| FolderTree::insert(f, folder("late"), None)),
            Box::new(move |f: &[FolderNode]| FolderTree::remove(f, d)),
            Box::new(move |f: &[FolderNode]| FolderTree::move_folder(f, b, None)),
        ];
        for step in steps {
            if let Ok(next) = step(&forest) {
                forest = next;
            }
            check_hierarchy(&forest).unwrap();
        }
    }

    #[test]
    fn test_with_script_counts_overwrites() {
        let (forest, [a, b, ..]) = sample();
        let forest = FolderTree::adjust_script_count(&forest, a, 9).unwrap();
        let counts = HashMap::from([(b, 2)]);
        let forest = FolderTree::with_script_counts(&forest, &counts);
        assert_eq!(FolderTree::find_by_id(&forest, a).unwrap().script_count, 0);
        assert_eq!(FolderTree::total_scripts(&forest), 2);
    }
}
