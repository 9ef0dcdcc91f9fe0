//! Integration tests for debounced document sync.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use deskfs_core::events::{EventPayload, SyncEvent, SyncPhase};
use deskfs_core::traits::cache::LocalCacheStore;
use deskfs_core::traits::remote::RemoteDirectory;
use deskfs_entity::comment::{CommentDb, CommentSnapshot, NewComment};
use deskfs_entity::folder::{FolderEntryUpdate, FolderMap};
use deskfs_entity::id::{DocumentId, ItemId};
use deskfs_remote::RemoteOp;

use helpers::{TestSession, test_config};

fn note(author: &str, text: &str) -> NewComment {
    NewComment {
        author: author.to_string(),
        text: text.to_string(),
    }
}

async fn remote_tree(t: &TestSession) -> FolderMap {
    let raw = t
        .remote
        .document_content(&t.session.bootstrap().db_document_id)
        .await
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_tree_mutations_is_written_once() {
    let t = TestSession::open().await;
    let db = t.session.bootstrap().db_document_id.clone();
    t.at_root().await;

    let tree = t.session.tree();
    for i in 0..5 {
        tree.upsert_many([FolderEntryUpdate::with_parent(
            ItemId::from(format!("f-{i}")),
            format!("Folder {i}"),
            ItemId::root(),
        )])
        .await;
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    assert_eq!(t.remote.document_writes(&db).await, 0);

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(t.remote.document_writes(&db).await, 1);
    assert_eq!(remote_tree(&t).await, tree.snapshot().await);
}

#[tokio::test(start_paused = true)]
async fn test_sync_status_follows_the_timer() {
    let t = TestSession::open().await;
    assert_eq!(t.session.sync_status(), (SyncPhase::Idle, SyncPhase::Idle));

    t.at_root().await;
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(t.session.sync_status().0, SyncPhase::Armed);

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(t.session.sync_status().0, SyncPhase::Idle);
    assert!(!t.session.tree().sync().is_dirty());
}

#[tokio::test(start_paused = true)]
async fn test_comment_is_local_at_once_and_remote_after_debounce() {
    let t = TestSession::open().await;
    let doc = t.session.bootstrap().comment_document_id.clone();
    let item = ItemId::from("img-1");

    let comments = t.session.comments();
    comments.add_comment(&item, note("Ann", "hi")).await.unwrap();
    let local = comments.comments_for(&item).await;
    assert_eq!(local.len(), 1);
    assert_eq!(local[0].author, "Ann");
    assert_eq!(t.remote.document_content(&doc).await.as_deref(), Some("{}"));

    tokio::time::sleep(Duration::from_secs(3)).await;
    let raw = t.remote.document_content(&doc).await.unwrap();
    let remote: CommentDb = serde_json::from_str(&raw).unwrap();
    assert_eq!(remote, comments.snapshot().await);
}

#[tokio::test(start_paused = true)]
async fn test_add_comment_now_writes_without_waiting() {
    let t = TestSession::open().await;
    let doc = t.session.bootstrap().comment_document_id.clone();

    t.session
        .comments()
        .add_comment_now(&ItemId::from("img-1"), note("Ann", "hi"))
        .await
        .unwrap();

    assert_eq!(t.remote.document_writes(&doc).await, 1);
    assert!(!t.session.comments().sync().is_dirty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_flush_waits_for_next_trigger() {
    let t = TestSession::open().await;
    let db = t.session.bootstrap().db_document_id.clone();
    let mut events = t.session.events().subscribe();

    t.remote.fail(RemoteOp::WriteDocument).await;
    t.at_root().await;
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(t.remote.document_writes(&db).await, 0);
    assert!(t.session.tree().sync().is_dirty());

    let mut failures = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event.payload, EventPayload::Sync(SyncEvent::FlushFailed { .. })) {
            failures += 1;
        }
    }
    assert_eq!(failures, 1);

    // No retry on its own.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(t.remote.document_writes(&db).await, 0);

    t.remote.recover(RemoteOp::WriteDocument).await;
    t.session.flush().await.unwrap();
    assert_eq!(t.remote.document_writes(&db).await, 1);
    assert_eq!(remote_tree(&t).await, t.session.tree().snapshot().await);
}

#[tokio::test(start_paused = true)]
async fn test_flush_of_clean_documents_writes_nothing() {
    let t = TestSession::open().await;
    let db = t.session.bootstrap().db_document_id.clone();
    let doc = t.session.bootstrap().comment_document_id.clone();

    t.session.flush().await.unwrap();
    assert_eq!(t.remote.document_writes(&db).await, 0);
    assert_eq!(t.remote.document_writes(&doc).await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_close_flushes_pending_changes() {
    let t = TestSession::open().await;
    let db = t.session.bootstrap().db_document_id.clone();
    let docs = t.remote.insert_folder(&ItemId::root(), "Docs").await;
    t.at_root().await;

    let TestSession {
        remote, session, ..
    } = t;
    session.close().await.unwrap();

    assert_eq!(remote.document_writes(&db).await, 1);
    let raw = remote.document_content(&db).await.unwrap();
    let map: FolderMap = serde_json::from_str(&raw).unwrap();
    assert_eq!(map.get(&docs).unwrap().name, "Docs");
}

#[tokio::test(start_paused = true)]
async fn test_next_session_starts_from_written_through_cache() {
    let first = TestSession::open().await;
    let docs = first.remote.insert_folder(&ItemId::root(), "Docs").await;
    first.at_root().await;
    tokio::time::sleep(Duration::from_secs(6)).await;

    let TestSession {
        remote,
        cache,
        session,
    } = first;
    session.close().await.unwrap();

    remote.fail(RemoteOp::ReadDocument).await;
    let second = TestSession::open_with(remote, Arc::clone(&cache), test_config()).await;
    let entry = second.session.tree().get(&docs).await.unwrap();
    assert_eq!(entry.name, "Docs");
    assert_eq!(entry.parent_id, ItemId::root());
}

#[tokio::test(start_paused = true)]
async fn test_corrupt_remote_document_is_rewritten_from_local_copy() {
    let t = TestSession::open().await;
    let db = t.session.bootstrap().db_document_id.clone();
    t.at_root().await;
    t.session.flush().await.unwrap();
    let local = t.session.tree().snapshot().await;
    assert!(!local.is_empty());

    RemoteDirectory::write_document(&t.remote, &db, "{not json")
        .await
        .unwrap();
    t.session.reload().await.unwrap();
    assert_eq!(t.session.tree().snapshot().await, local);
    assert!(t.session.tree().sync().is_dirty());

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(remote_tree(&t).await, local);
}

#[tokio::test(start_paused = true)]
async fn test_reload_keeps_unflushed_local_changes() {
    let t = TestSession::open().await;
    t.at_root().await;
    let pending = t.session.tree().snapshot().await;

    t.session.reload().await.unwrap();
    assert_eq!(t.session.tree().snapshot().await, pending);
    assert!(t.session.tree().sync().is_dirty());
}

#[tokio::test(start_paused = true)]
async fn test_reload_keeps_changes_made_while_reading() {
    let t = TestSession::open().await;
    let tree = t.session.tree();
    let comments = t.session.comments();
    assert!(!tree.sync().is_dirty());
    assert!(!comments.sync().is_dirty());

    t.remote.set_latency(Duration::from_millis(100)).await;
    let fresh = ItemId::from("f-new");
    let item = ItemId::from("img-1");
    let (reloaded, _) = tokio::join!(t.session.reload(), async {
        // Lands during the tree read.
        tokio::time::sleep(Duration::from_millis(10)).await;
        tree.upsert_many([FolderEntryUpdate::with_parent(
            fresh.clone(),
            "New",
            ItemId::root(),
        )])
        .await;
        // Lands during the comment read.
        tokio::time::sleep(Duration::from_millis(140)).await;
        comments.add_comment(&item, note("Ann", "hi")).await.unwrap();
    });
    reloaded.unwrap();

    assert_eq!(tree.get(&fresh).await.unwrap().name, "New");
    assert!(tree.sync().is_dirty());
    assert_eq!(comments.count_for(&item).await, 1);
    assert!(comments.sync().is_dirty());
}

#[tokio::test(start_paused = true)]
async fn test_comment_cache_is_only_used_for_its_own_document() {
    let first = TestSession::open().await;
    let doc = first.session.bootstrap().comment_document_id.clone();
    let TestSession {
        remote,
        cache,
        session,
    } = first;
    session.close().await.unwrap();

    let item = ItemId::from("img-1");
    let mut comments = CommentDb::new();
    comments.insert(item.clone(), vec![note("Ann", "hi").into_comment(item.clone())]);
    let cached_for = |document_id: DocumentId| CommentSnapshot {
        document_id,
        comments: comments.clone(),
        last_sync_timestamp: Utc::now(),
    };
    remote.fail(RemoteOp::ReadDocument).await;

    cache
        .put_comment_snapshot(&cached_for(DocumentId::from("another-desktop")))
        .await
        .unwrap();
    let other = TestSession::open_with(remote.clone(), Arc::clone(&cache), test_config()).await;
    assert_eq!(other.session.comments().count_for(&item).await, 0);
    other.session.close().await.unwrap();

    cache.put_comment_snapshot(&cached_for(doc)).await.unwrap();
    let own = TestSession::open_with(remote, Arc::clone(&cache), test_config()).await;
    assert_eq!(own.session.comments().count_for(&item).await, 1);
}
