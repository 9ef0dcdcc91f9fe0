//! In-memory cache implementation using the moka crate.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use moka::future::Cache;
use tracing::debug;

use deskfs_core::config::cache::MemoryCacheConfig;
use deskfs_core::result::AppResult;
use deskfs_core::traits::cache::LocalCacheStore;
use deskfs_entity::comment::CommentSnapshot;
use deskfs_entity::folder::TreeSnapshot;
use deskfs_entity::item::Item;

use crate::entry::CachedListing;
use crate::keys;

/// In-memory cache store.
///
/// Snapshots are held as serialized JSON so a reader never aliases the
/// engine's live maps.
#[derive(Debug, Clone)]
pub struct MemoryCacheStore {
    /// Folder listings, bounded and expiring.
    folders: Cache<String, Arc<CachedListing>>,
    /// Singleton snapshots keyed by [`keys::tree_snapshot`] / [`keys::comment_snapshot`].
    snapshots: Arc<DashMap<String, String>>,
}

impl MemoryCacheStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let folders = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.time_to_live_seconds))
            .build();

        Self {
            folders,
            snapshots: Arc::new(DashMap::new()),
        }
    }

    fn get_snapshot<T: serde::de::DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.snapshots.get(key) {
            Some(json) => Ok(Some(serde_json::from_str(json.value())?)),
            None => Ok(None),
        }
    }

    fn put_snapshot<T: serde::Serialize>(&self, key: String, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.snapshots.insert(key, json);
        Ok(())
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new(&MemoryCacheConfig::default())
    }
}

#[async_trait]
impl LocalCacheStore for MemoryCacheStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn get_cached_folder(&self, key: &str) -> AppResult<Option<Vec<Item>>> {
        let hit = self.folders.get(key).await;
        debug!(key, hit = hit.is_some(), "Folder cache lookup");
        Ok(hit.map(|entry| entry.items.clone()))
    }

    async fn put_cached_folder(&self, key: &str, items: &[Item]) -> AppResult<()> {
        self.folders
            .insert(key.to_string(), Arc::new(CachedListing::new(key, items)))
            .await;
        Ok(())
    }

    async fn get_tree_snapshot(&self) -> AppResult<Option<TreeSnapshot>> {
        self.get_snapshot(&keys::tree_snapshot())
    }

    async fn put_tree_snapshot(&self, snapshot: &TreeSnapshot) -> AppResult<()> {
        self.put_snapshot(keys::tree_snapshot(), snapshot)
    }

    async fn get_comment_snapshot(&self) -> AppResult<Option<CommentSnapshot>> {
        self.get_snapshot(&keys::comment_snapshot())
    }

    async fn put_comment_snapshot(&self, snapshot: &CommentSnapshot) -> AppResult<()> {
        self.put_snapshot(keys::comment_snapshot(), snapshot)
    }

    async fn clear(&self) -> AppResult<()> {
        self.folders.invalidate_all();
        self.snapshots.clear();
        Ok(())
    }
}
