//! Local cache store trait for durable key/value persistence.

use async_trait::async_trait;

use deskfs_entity::comment::CommentSnapshot;
use deskfs_entity::folder::TreeSnapshot;
use deskfs_entity::item::Item;

use crate::result::AppResult;

/// Trait for the local persistence layer.
///
/// Holds one listing per folder plus singleton snapshots of the tree index
/// and the comment document. Pure persistence: no business logic. Callers
/// treat any error as a cache miss.
#[async_trait]
pub trait LocalCacheStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. "memory", "file").
    fn provider_type(&self) -> &str;

    /// Get the cached listing for a folder key. `Some(vec![])` is a cached
    /// empty folder, distinct from `None` (never loaded).
    async fn get_cached_folder(&self, key: &str) -> AppResult<Option<Vec<Item>>>;

    /// Store the listing for a folder key, replacing any previous one.
    async fn put_cached_folder(&self, key: &str, items: &[Item]) -> AppResult<()>;

    /// Get the cached tree-index snapshot.
    async fn get_tree_snapshot(&self) -> AppResult<Option<TreeSnapshot>>;

    /// Store the tree-index snapshot.
    async fn put_tree_snapshot(&self, snapshot: &TreeSnapshot) -> AppResult<()>;

    /// Get the cached comment-document snapshot.
    async fn get_comment_snapshot(&self) -> AppResult<Option<CommentSnapshot>>;

    /// Store the comment-document snapshot.
    async fn put_comment_snapshot(&self, snapshot: &CommentSnapshot) -> AppResult<()>;

    /// Drop every cached entry.
    async fn clear(&self) -> AppResult<()>;
}
