//! Integration tests for folder operations.

mod helpers;

use scripthub_core::error::ErrorKind;
use scripthub_core::types::FolderId;
use scripthub_entity::folder::{CreateFolder, FolderPatch};
use scripthub_service::{DeletePolicy, FolderTree};
use uuid::Uuid;

#[tokio::test]
async fn test_create_root_and_child() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Channel").await;

    let a = app.folder(project.id, "A", None).await;
    let b = app.folder(project.id, "B", Some(a)).await;

    let tree = app.folders.get_tree(project.id).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].id, a);
    assert_eq!(tree[0].script_count, 0);
    assert_eq!(tree[0].children.len(), 1);
    assert_eq!(tree[0].children[0].id, b);
    assert_eq!(FolderTree::total_scripts(&tree), 0);

    let project = app.projects.get_project(project.id).await.unwrap();
    assert_eq!(project.stats.total_scripts, 0);
    assert!(project.updated_at > project.created_at);
}

#[tokio::test]
async fn test_create_under_missing_parent() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Channel").await;

    let err = app
        .folders
        .create_folder(
            project.id,
            CreateFolder {
                name: "Orphan".into(),
                parent_id: Some(FolderId::from_uuid(Uuid::new_v4())),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.folders.get_tree(project.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Channel").await;

    let err = app
        .folders
        .create_folder(
            project.id,
            CreateFolder {
                name: "   ".into(),
                parent_id: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_rename_folder() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Channel").await;
    let a = app.folder(project.id, "A", None).await;

    app.folders
        .rename_folder(project.id, a, FolderPatch::rename(" Shorts "))
        .await
        .unwrap();
    assert_eq!(app.folders.find_folder(project.id, a).await.unwrap().name, "Shorts");

    let ghost = FolderId::from_uuid(Uuid::new_v4());
    let err = app
        .folders
        .rename_folder(project.id, ghost, FolderPatch::rename("x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_move_folder_rejects_cycle() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Channel").await;
    let a = app.folder(project.id, "A", None).await;
    let b = app.folder(project.id, "B", Some(a)).await;

    let err = app.folders.move_folder(project.id, a, Some(b)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidHierarchy);

    let project = app.folders.move_folder(project.id, b, None).await.unwrap();
    assert_eq!(project.folders.len(), 2);
    assert!(project.folders.iter().all(|f| f.is_root()));
}

#[tokio::test]
async fn test_remove_root_removes_subtree() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Channel").await;
    let a = app.folder(project.id, "A", None).await;
    let b = app.folder(project.id, "B", Some(a)).await;

    let deletion = app
        .folders
        .delete_folder(project.id, a, DeletePolicy::CascadeDelete)
        .await
        .unwrap();
    assert!(deletion.project.folders.is_empty());
    assert_eq!(deletion.removed_folders, vec![a, b]);
    assert_eq!(deletion.scripts_deleted, 0);
}

#[tokio::test]
async fn test_delete_cascade_removes_scripts() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Channel").await;
    let a = app.folder(project.id, "A", None).await;
    let b = app.folder(project.id, "B", Some(a)).await;
    let keep = app.folder(project.id, "Keep", None).await;

    app.script(project.id, a, "one").await;
    app.script(project.id, b, "two").await;
    let survivor = app.script(project.id, keep, "three").await;

    let deletion = app
        .folders
        .delete_folder(project.id, a, DeletePolicy::CascadeDelete)
        .await
        .unwrap();
    assert_eq!(deletion.scripts_deleted, 2);
    assert_eq!(deletion.project.stats.total_scripts, 1);

    let remaining = app.script_repo.find_all_in_project(project.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, survivor.id);
}

#[tokio::test]
async fn test_delete_reassigns_scripts() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Channel").await;
    let a = app.folder(project.id, "A", None).await;
    let b = app.folder(project.id, "B", Some(a)).await;
    let inbox = app.folder(project.id, "Inbox", None).await;

    let s1 = app.script(project.id, a, "one").await;
    let s2 = app.script(project.id, b, "two").await;

    let deletion = app
        .folders
        .delete_folder(project.id, a, DeletePolicy::ReassignTo(inbox))
        .await
        .unwrap();
    assert_eq!(deletion.scripts_reassigned, 2);
    assert_eq!(deletion.project.stats.total_scripts, 2);
    assert_eq!(app.count_of(project.id, inbox).await, 2);

    for id in [s1.id, s2.id] {
        assert_eq!(app.scripts.get_script(id).await.unwrap().folder_id, inbox);
    }
}

#[tokio::test]
async fn test_delete_reassign_into_removed_subtree_rejected() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Channel").await;
    let a = app.folder(project.id, "A", None).await;
    let b = app.folder(project.id, "B", Some(a)).await;
    app.script(project.id, b, "one").await;

    let err = app
        .folders
        .delete_folder(project.id, a, DeletePolicy::ReassignTo(b))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidHierarchy);

    // Nothing was committed.
    assert_eq!(app.folders.get_tree(project.id).await.unwrap().len(), 1);
    assert_eq!(app.count_of(project.id, b).await, 1);
}

#[tokio::test]
async fn test_adjust_script_count_clamps_at_zero() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Channel").await;
    let a = app.folder(project.id, "A", None).await;

    app.folders.adjust_script_count(project.id, a, 2).await.unwrap();
    let project = app.folders.adjust_script_count(project.id, a, -5).await.unwrap();
    assert_eq!(project.stats.total_scripts, 0);
    assert_eq!(app.count_of(project.id, a).await, 0);
}

#[tokio::test]
async fn test_depth_limit_enforced() {
    let limits = scripthub_core::config::limits::LimitsConfig {
        max_folder_depth: 2,
        ..Default::default()
    };
    let app = helpers::TestApp::with_limits(limits).await;
    let project = app.project("Channel").await;
    let a = app.folder(project.id, "A", None).await;
    let b = app.folder(project.id, "B", Some(a)).await;

    let err = app
        .folders
        .create_folder(
            project.id,
            CreateFolder {
                name: "C".into(),
                parent_id: Some(b),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_rejected_cascade_delete_keeps_scripts() {
    let app = helpers::TestApp::new().await;
    let (project, _, d, script) = app.three_deep().await;
    let (folders, _) = app.services_with_limits(helpers::TestApp::two_levels());

    let err = folders
        .delete_folder(project.id, d, DeletePolicy::CascadeDelete)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    assert!(app.script_repo.find_by_id(script.id).await.unwrap().is_some());
    assert_eq!(app.count_of(project.id, d).await, 1);
    let project = app.projects.get_project(project.id).await.unwrap();
    assert_eq!(project.stats.total_scripts, 1);
}

#[tokio::test]
async fn test_rejected_reassign_delete_keeps_scripts() {
    let app = helpers::TestApp::new().await;
    let (project, a, d, script) = app.three_deep().await;
    let (folders, _) = app.services_with_limits(helpers::TestApp::two_levels());

    let err = folders
        .delete_folder(project.id, d, DeletePolicy::ReassignTo(a))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let stored = app.script_repo.get(script.id).await.unwrap();
    assert_eq!(stored.folder_id, d);
    assert_eq!(stored.updated_at, script.updated_at);
    assert_eq!(app.count_of(project.id, d).await, 1);
    assert_eq!(app.count_of(project.id, a).await, 0);
}
