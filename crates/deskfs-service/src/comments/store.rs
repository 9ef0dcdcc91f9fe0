//! Per-item comment threads.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use deskfs_core::error::AppError;
use deskfs_core::events::DocumentKind;
use deskfs_core::result::AppResult;
use deskfs_core::traits::cache::LocalCacheStore;
use deskfs_core::traits::remote::RemoteDirectory;
use deskfs_entity::comment::{Comment, CommentDb, CommentSnapshot, NewComment};
use deskfs_entity::id::{DocumentId, ItemId};

use crate::sync::{SyncSource, SyncTrigger, decode_document};

/// Append-only comment lists keyed by item id, synced to their own
/// remote document.
#[derive(Debug)]
pub struct CommentStore {
    db: RwLock<CommentDb>,
    document_id: DocumentId,
    sync: SyncTrigger,
}

impl CommentStore {
    /// Create a store over an initial document.
    pub fn new(document_id: DocumentId, db: CommentDb, sync: SyncTrigger) -> Self {
        Self {
            db: RwLock::new(db),
            document_id,
            sync,
        }
    }

    /// The remote document this store is flushed to.
    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    /// The sync channel handle.
    pub fn sync(&self) -> &SyncTrigger {
        &self.sync
    }

    /// Append a comment and schedule a debounced flush.
    pub async fn add_comment(&self, item_id: &ItemId, new: NewComment) -> AppResult<Comment> {
        if new.author.trim().is_empty() {
            return Err(AppError::validation("Comment author cannot be empty"));
        }
        if new.text.trim().is_empty() {
            return Err(AppError::validation("Comment text cannot be empty"));
        }

        let comment = new.into_comment(item_id.clone());
        let mut db = self.db.write().await;
        db.entry(item_id.clone()).or_default().push(comment.clone());
        self.sync.mark_dirty();
        drop(db);

        info!(item_id = %item_id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    /// Append a comment and wait until the comment document is written.
    ///
    /// The comment stays in the local map even when the write fails.
    pub async fn add_comment_now(&self, item_id: &ItemId, new: NewComment) -> AppResult<Comment> {
        let comment = self.add_comment(item_id, new).await?;
        self.sync.flush_now().await?;
        Ok(comment)
    }

    /// Comments on an item, oldest first.
    pub async fn comments_for(&self, item_id: &ItemId) -> Vec<Comment> {
        self.db
            .read()
            .await
            .get(item_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of comments on an item.
    pub async fn count_for(&self, item_id: &ItemId) -> usize {
        self.db.read().await.get(item_id).map_or(0, Vec::len)
    }

    /// Copy of the whole document.
    pub async fn snapshot(&self) -> CommentDb {
        self.db.read().await.clone()
    }

    /// Replace the whole document with one read remotely.
    ///
    /// `read_at` is [`SyncTrigger::revision`] taken before the read started.
    /// Returns `false` and keeps the local document when a comment was added
    /// since then or local comments are still unflushed.
    pub async fn replace_from_remote(&self, db: CommentDb, read_at: u64) -> bool {
        let mut current = self.db.write().await;
        if self.sync.revision() != read_at || self.sync.is_dirty() {
            return false;
        }
        *current = db;
        self.sync.mark_clean();
        true
    }

    /// Pull the remote document and adopt it when nothing local is pending.
    ///
    /// Returns `false` when the refresh was skipped because local comments
    /// have not been flushed yet.
    pub async fn refresh_from_remote(&self, remote: &dyn RemoteDirectory) -> AppResult<bool> {
        if self.sync.is_dirty() {
            debug!("Skipping comment refresh, local changes pending");
            return Ok(false);
        }

        let read_at = self.sync.revision();
        let raw = remote.read_document(&self.document_id).await?;
        let db: CommentDb = decode_document(DocumentKind::Comments, &raw)?;

        // A comment added while the read was in flight wins over the
        // remote copy until it is flushed.
        if !self.replace_from_remote(db, read_at).await {
            debug!("Discarding comment refresh, local change arrived");
            return Ok(false);
        }
        Ok(true)
    }
}

#[async_trait]
impl SyncSource for CommentStore {
    type Snapshot = CommentDb;

    fn kind(&self) -> DocumentKind {
        DocumentKind::Comments
    }

    async fn snapshot(&self) -> CommentDb {
        CommentStore::snapshot(self).await
    }

    async fn write_through(&self, cache: &dyn LocalCacheStore, db: &CommentDb) -> AppResult<()> {
        cache
            .put_comment_snapshot(&CommentSnapshot {
                document_id: self.document_id.clone(),
                comments: db.clone(),
                last_sync_timestamp: Utc::now(),
            })
            .await
    }
}
