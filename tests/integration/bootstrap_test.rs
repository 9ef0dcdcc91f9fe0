//! Integration tests for first-boot discovery.

mod helpers;

use std::sync::Arc;

use bytes::Bytes;
use deskfs_cache::memory::MemoryCacheStore;
use deskfs_core::traits::remote::RemoteDirectory;
use deskfs_entity::id::ItemId;
use deskfs_remote::MemoryRemoteDirectory;

use helpers::{TestSession, test_config};

const TREE_DOCUMENT: &str = r#"{
    "f-photos": {"id": "f-photos", "name": "Photos", "parentId": "root"},
    "f-2024": {"id": "f-2024", "name": "2024", "parentId": "f-photos"}
}"#;

const COMMENT_DOCUMENT: &str = r#"{
    "img-1": [{
        "id": "5d1f6c1e-3c37-4c59-9b9e-8a1f0f1d2a11",
        "itemId": "img-1",
        "author": "Ann",
        "text": "nice shot",
        "timestamp": "2024-05-01T10:00:00Z"
    }]
}"#;

#[tokio::test]
async fn test_empty_backend_is_bootstrapped() {
    let t = TestSession::open().await;
    let state = t.session.bootstrap().clone();

    assert_eq!(
        t.remote.name_of(&state.system_folder_id).await.as_deref(),
        Some("System")
    );
    assert_eq!(
        t.remote.document_content(&state.db_document_id).await.as_deref(),
        Some("{}")
    );
    assert_eq!(
        t.remote.document_content(&state.comment_document_id).await.as_deref(),
        Some("{}")
    );
    assert!(t.session.tree().is_empty().await);
}

#[tokio::test]
async fn test_reopening_reuses_the_same_objects() {
    let first = TestSession::open().await;
    let state = first.session.bootstrap().clone();
    let objects = first.remote.object_count().await;
    let remote = first.remote.clone();
    first.session.close().await.unwrap();

    let second = TestSession::open_with(
        remote,
        Arc::new(MemoryCacheStore::default()),
        test_config(),
    )
    .await;
    assert_eq!(second.session.bootstrap(), &state);
    assert_eq!(second.remote.object_count().await, objects);
}

#[tokio::test]
async fn test_existing_documents_are_loaded() {
    let remote = MemoryRemoteDirectory::new();
    let system = remote.insert_folder(&ItemId::root(), "System").await;
    for (name, content) in [
        ("folder_map.json", TREE_DOCUMENT),
        ("comments.json", COMMENT_DOCUMENT),
    ] {
        remote
            .upload_file(
                Bytes::from_static(content.as_bytes()),
                name,
                "application/json",
                &system,
            )
            .await
            .unwrap();
    }

    let t = TestSession::open_with(
        remote,
        Arc::new(MemoryCacheStore::default()),
        test_config(),
    )
    .await;
    assert_eq!(t.session.bootstrap().system_folder_id, system);

    let tree = t.session.tree();
    assert_eq!(tree.len().await, 2);
    let year = tree.get(&ItemId::from("f-2024")).await.unwrap();
    assert_eq!(year.name, "2024");
    assert_eq!(year.parent_id, ItemId::from("f-photos"));
    let path: Vec<String> = tree
        .path_to(&ItemId::from("f-2024"))
        .await
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    assert_eq!(path, vec!["Photos", "2024"]);

    let comments = t.session.comments().comments_for(&ItemId::from("img-1")).await;
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, "Ann");
    assert_eq!(comments[0].text, "nice shot");

    assert!(!tree.sync().is_dirty());
    assert!(!t.session.comments().sync().is_dirty());
}

#[tokio::test]
async fn test_partial_bootstrap_only_creates_what_is_missing() {
    let remote = MemoryRemoteDirectory::new();
    let system = remote.insert_folder(&ItemId::root(), "System").await;
    let tree_doc = remote
        .upload_file(
            Bytes::from_static(b"{}"),
            "folder_map.json",
            "application/json",
            &system,
        )
        .await
        .unwrap();

    let t = TestSession::open_with(
        remote,
        Arc::new(MemoryCacheStore::default()),
        test_config(),
    )
    .await;
    let state = t.session.bootstrap();
    assert_eq!(state.system_folder_id, system);
    assert_eq!(state.db_document_id.as_str(), tree_doc.id.as_str());
    assert_eq!(
        t.remote
            .parent_of(&ItemId::from(state.comment_document_id.as_str()))
            .await,
        Some(system)
    );
}
