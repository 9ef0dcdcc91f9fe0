//! Cache manager that dispatches to the configured store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use deskfs_core::config::cache::CacheConfig;
use deskfs_core::error::AppError;
use deskfs_core::result::AppResult;
use deskfs_core::traits::cache::LocalCacheStore;
use deskfs_entity::comment::CommentSnapshot;
use deskfs_entity::folder::TreeSnapshot;
use deskfs_entity::item::Item;

/// Cache manager that wraps the configured cache store.
///
/// The store is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// The inner cache store.
    inner: Arc<dyn LocalCacheStore>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn LocalCacheStore> = match config.provider.as_str() {
            #[cfg(feature = "file")]
            "file" => {
                info!(directory = %config.directory, "Initializing file cache store");
                Arc::new(crate::file::FileCacheStore::open(&config.directory).await?)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory cache store");
                Arc::new(crate::memory::MemoryCacheStore::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, file"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a cache manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn LocalCacheStore>) -> Self {
        Self { inner: store }
    }

    /// Get a reference to the inner store.
    pub fn store(&self) -> &dyn LocalCacheStore {
        self.inner.as_ref()
    }
}

#[async_trait]
impl LocalCacheStore for CacheManager {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn get_cached_folder(&self, key: &str) -> AppResult<Option<Vec<Item>>> {
        self.inner.get_cached_folder(key).await
    }

    async fn put_cached_folder(&self, key: &str, items: &[Item]) -> AppResult<()> {
        self.inner.put_cached_folder(key, items).await
    }

    async fn get_tree_snapshot(&self) -> AppResult<Option<TreeSnapshot>> {
        self.inner.get_tree_snapshot().await
    }

    async fn put_tree_snapshot(&self, snapshot: &TreeSnapshot) -> AppResult<()> {
        self.inner.put_tree_snapshot(snapshot).await
    }

    async fn get_comment_snapshot(&self) -> AppResult<Option<CommentSnapshot>> {
        self.inner.get_comment_snapshot().await
    }

    async fn put_comment_snapshot(&self, snapshot: &CommentSnapshot) -> AppResult<()> {
        self.inner.put_comment_snapshot(snapshot).await
    }

    async fn clear(&self) -> AppResult<()> {
        self.inner.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = CacheConfig {
            provider: "redis".into(),
            ..CacheConfig::default()
        };
        let err = CacheManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, deskfs_core::error::ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_memory_provider_selected() {
        let manager = CacheManager::new(&CacheConfig::default()).await.unwrap();
        assert_eq!(manager.provider_type(), "memory");
    }
}
