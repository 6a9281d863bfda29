//! Integration tests for project lifecycle and count reconciliation.

mod helpers;

use scripthub_core::error::ErrorKind;
use scripthub_core::traits::DocumentStore;
use scripthub_core::types::{FilterField, PageRequest, UserId};
use scripthub_entity::project::{CreateProject, UpdateProject, Visibility};
use scripthub_store::repositories::SCRIPTS;
use uuid::Uuid;

#[tokio::test]
async fn test_create_and_get_project() {
    let app = helpers::TestApp::new().await;
    let project = app.project("  Weekly vlog  ").await;

    assert_eq!(project.title, "Weekly vlog");
    assert!(project.folders.is_empty());
    assert_eq!(project.stats.total_scripts, 0);

    let fetched = app.projects.get_project(project.id).await.unwrap();
    assert_eq!(fetched, project);
}

#[tokio::test]
async fn test_create_rejects_empty_title() {
    let app = helpers::TestApp::new().await;
    let err = app
        .projects
        .create_project(CreateProject {
            owner_id: app.owner,
            title: "".into(),
            description: String::new(),
            settings: Default::default(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_list_by_owner_most_recent_first() {
    let app = helpers::TestApp::new().await;
    let first = app.project("First").await;
    let second = app.project("Second").await;
    app.folder(first.id, "Touch", None).await;

    let page = app
        .projects
        .list_by_owner(app.owner, PageRequest::default())
        .await
        .unwrap();
    let ids: Vec<_> = page.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let stranger = UserId::from_uuid(Uuid::new_v4());
    let page = app
        .projects
        .list_by_owner(stranger, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn test_update_project() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Draft").await;

    let updated = app
        .projects
        .update_project(
            project.id,
            UpdateProject {
                title: Some("Launch".into()),
                settings: Some(scripthub_entity::project::ProjectSettings {
                    visibility: Visibility::Public,
                    allow_collaboration: true,
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Launch");
    assert_eq!(updated.settings.visibility, Visibility::Public);
    assert!(updated.updated_at > project.updated_at);

    let err = app
        .projects
        .update_project(project.id, UpdateProject::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_delete_project_cascades_scripts() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Doomed").await;
    let other = app.project("Other").await;
    let folder = app.folder(project.id, "A", None).await;
    let other_folder = app.folder(other.id, "B", None).await;
    app.script(project.id, folder, "one").await;
    app.script(project.id, folder, "two").await;
    app.script(other.id, other_folder, "three").await;

    assert_eq!(app.projects.delete_project(project.id).await.unwrap(), 2);
    assert_eq!(
        app.projects.get_project(project.id).await.unwrap_err().kind,
        ErrorKind::NotFound
    );
    assert_eq!(app.store.count(SCRIPTS, &[]).await.unwrap(), 1);

    let err = app.projects.delete_project(project.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_reconcile_clean_project() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Clean").await;
    let folder = app.folder(project.id, "A", None).await;
    app.script(project.id, folder, "one").await;

    let report = app.projects.reconcile_script_counts(project.id).await.unwrap();
    assert!(report.is_clean());
    assert!(report.orphaned_scripts.is_empty());
    assert_eq!(report.project.stats.total_scripts, 1);
}

#[tokio::test]
async fn test_reconcile_repairs_drift() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Drifty").await;
    let a = app.folder(project.id, "A", None).await;
    let b = app.folder(project.id, "B", None).await;
    app.script(project.id, a, "one").await;
    app.script(project.id, a, "two").await;

    // A script removed behind the service's back leaves A over-counted.
    let removed = app
        .store
        .delete_many(SCRIPTS, &[FilterField::eq("content", "two")])
        .await
        .unwrap();
    assert_eq!(removed, 1);
    app.folders.adjust_script_count(project.id, b, 3).await.unwrap();

    let report = app.projects.reconcile_script_counts(project.id).await.unwrap();
    assert_eq!(report.drift.len(), 2);
    let a_drift = report.drift.iter().find(|d| d.folder_id == a).unwrap();
    assert_eq!((a_drift.cached, a_drift.actual), (2, 1));
    let b_drift = report.drift.iter().find(|d| d.folder_id == b).unwrap();
    assert_eq!((b_drift.cached, b_drift.actual), (3, 0));

    assert_eq!(report.project.stats.total_scripts, 1);
    assert_eq!(app.count_of(project.id, a).await, 1);
    assert_eq!(app.count_of(project.id, b).await, 0);
}

#[tokio::test]
async fn test_reconcile_reports_orphans() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Orphans").await;
    let a = app.folder(project.id, "A", None).await;
    let script = app.script(project.id, a, "one").await;

    // Drop the folder from the tree without touching its scripts.
    let tree = app.folders.get_tree(project.id).await.unwrap();
    let project_doc = app.projects.get_project(project.id).await.unwrap();
    assert_eq!(tree.len(), 1);
    let mut stripped = project_doc.clone();
    stripped.folders.clear();
    app.store
        .replace(
            "projects",
            &project.id.to_string(),
            serde_json::to_value(&stripped).unwrap(),
        )
        .await
        .unwrap();

    let report = app.projects.reconcile_script_counts(project.id).await.unwrap();
    assert_eq!(report.orphaned_scripts, vec![script.id]);
    assert!(report.is_clean());
    assert_eq!(report.project.stats.total_scripts, 0);
}
