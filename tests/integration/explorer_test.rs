//! Integration tests for navigation and bulk operations.

mod helpers;

use deskfs_core::error::ErrorKind;
use deskfs_entity::id::ItemId;
use deskfs_entity::item::{Item, ItemKind};
use deskfs_remote::RemoteOp;

use helpers::{SYSTEM_PASSWORD, TestSession, locked_config};

#[tokio::test]
async fn test_every_listed_folder_is_indexed_under_its_parent() {
    let t = TestSession::open().await;
    let docs = t.remote.insert_folder(&ItemId::root(), "Docs").await;
    let pics = t.remote.insert_folder(&ItemId::root(), "Pics").await;
    let work = t.remote.insert_folder(&docs, "Work").await;

    t.at_root().await;
    t.session.navigate(&docs).await.unwrap();

    let tree = t.session.tree();
    assert_eq!(tree.get(&docs).await.unwrap().parent_id, ItemId::root());
    assert_eq!(tree.get(&pics).await.unwrap().parent_id, ItemId::root());
    assert_eq!(tree.get(&work).await.unwrap().parent_id, docs);
    let path: Vec<String> = tree.path_to(&work).await.into_iter().map(|e| e.name).collect();
    assert_eq!(path, vec!["Docs", "Work"]);
}

#[tokio::test]
async fn test_repeated_listing_is_idempotent() {
    let t = TestSession::open().await;
    t.remote.insert_folder(&ItemId::root(), "folder10").await;
    t.remote.insert_folder(&ItemId::root(), "Folder2").await;

    t.at_root().await;
    let first = t.session.loader().cached_listing(&ItemId::root()).await.unwrap();
    t.at_root().await;
    let second = t.session.loader().cached_listing(&ItemId::root()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(t.shown_names().await, vec!["Folder2", "folder10", "System"]);
}

#[tokio::test]
async fn test_empty_folder_is_cached() {
    let t = TestSession::open().await;
    let empty = t.remote.insert_folder(&ItemId::root(), "Empty").await;
    t.session.navigate(&empty).await.unwrap();
    assert_eq!(t.session.loader().cached_listing(&empty).await, Some(Vec::new()));
}

#[tokio::test]
async fn test_move_invariant() {
    let t = TestSession::open().await;
    let a = t.remote.insert_folder(&ItemId::root(), "A").await;
    let b = t.remote.insert_folder(&ItemId::root(), "B").await;
    let target = t.remote.insert_folder(&ItemId::root(), "Target").await;
    t.at_root().await;

    t.session
        .coordinator()
        .move_items(&[a.clone(), b.clone()], &target)
        .await
        .unwrap();

    let shown = t.shown_ids().await;
    assert!(!shown.contains(&a));
    assert!(!shown.contains(&b));
    assert_eq!(t.session.tree().get(&a).await.unwrap().parent_id, target);
    assert_eq!(t.session.tree().get(&b).await.unwrap().parent_id, target);
}

#[tokio::test]
async fn test_failed_move_restores_item_list() {
    let t = TestSession::open().await;
    let a = t.remote.insert_folder(&ItemId::root(), "A").await;
    let target = t.remote.insert_folder(&ItemId::root(), "Target").await;
    t.at_root().await;
    let before = t.session.explorer().items().await;

    t.remote.fail(RemoteOp::MoveItems).await;
    let err = t
        .session
        .coordinator()
        .move_items(&[a], &target)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(t.session.explorer().items().await, before);
}

#[tokio::test]
async fn test_rename_draft_to_final() {
    let t = TestSession::open().await;
    t.remote
        .insert(&ItemId::root(), Item::new("note-1", ItemKind::Note, "Draft"))
        .await;
    t.at_root().await;

    t.session
        .coordinator()
        .rename_item(&ItemId::from("note-1"), "Final")
        .await
        .unwrap();

    let names = t.shown_names().await;
    assert_eq!(names.iter().filter(|n| *n == "Final").count(), 1);
    assert!(!names.iter().any(|n| n == "Draft"));
}

#[tokio::test]
async fn test_delete_then_purge_from_recycle_bin() {
    let t = TestSession::open().await;
    let a = t.remote.insert_folder(&ItemId::root(), "A").await;
    t.at_root().await;

    let coordinator = t.session.coordinator();
    coordinator.delete_items(&[a.clone()]).await.unwrap();
    assert!(t.remote.contains(&a).await);
    assert_eq!(t.shown_names().await, vec!["Recycle Bin", "System"]);

    let bin = t.session.explorer().recycle_bin_id().await.unwrap();
    t.session.navigate(&bin).await.unwrap();
    assert_eq!(t.shown_ids().await, vec![a.clone()]);

    coordinator.purge(&[a.clone()]).await.unwrap();
    assert!(!t.remote.contains(&a).await);
    assert!(t.session.tree().get(&a).await.is_none());
}

#[tokio::test]
async fn test_system_folder_gate() {
    let remote = deskfs_remote::MemoryRemoteDirectory::new();
    let t = TestSession::open_with(remote, Default::default(), locked_config()).await;
    let system = t.session.bootstrap().system_folder_id.clone();

    let err = t.session.navigate(&system).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::PermissionDenied);
    assert!(t.session.unlock_system("wrong").is_err());

    t.session.unlock_system(SYSTEM_PASSWORD).unwrap();
    t.session.navigate(&system).await.unwrap();
    assert_eq!(t.shown_names().await, vec!["comments.json", "folder_map.json"]);
}

#[tokio::test]
async fn test_upload_and_note_land_in_current_folder() {
    let t = TestSession::open().await;
    let docs = t.remote.insert_folder(&ItemId::root(), "Docs").await;
    t.session.navigate(&docs).await.unwrap();

    let coordinator = t.session.coordinator();
    let image = coordinator
        .upload_file(bytes::Bytes::from_static(b"\x89PNG"), "cat.png", "image/png")
        .await
        .unwrap();
    let note = coordinator.save_note("todo", "milk").await.unwrap();

    assert_eq!(t.remote.parent_of(&image.id).await, Some(docs.clone()));
    assert_eq!(t.remote.parent_of(&note.id).await, Some(docs));
    assert_eq!(t.shown_names().await, vec!["cat.png", "todo"]);
}
