//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use deskfs_cache::memory::MemoryCacheStore;
use deskfs_core::config::AppConfig;
use deskfs_entity::id::ItemId;
use deskfs_remote::MemoryRemoteDirectory;
use deskfs_service::SessionContext;

/// Password configured by [`locked_config`].
pub const SYSTEM_PASSWORD: &str = "open sesame";

/// Test session context
pub struct TestSession {
    /// In-process backend, shared with the session
    pub remote: MemoryRemoteDirectory,
    /// Local cache, shared with the session
    pub cache: Arc<MemoryCacheStore>,
    /// The session under test
    pub session: SessionContext,
}

/// Config with the standard debounce windows and no periodic refresh
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.sync.tree_debounce_ms = 5_000;
    config.sync.comment_debounce_ms = 2_000;
    config.sync.comment_refresh_seconds = 0;
    config
}

/// [`test_config`] with a password on the system folder
pub fn locked_config() -> AppConfig {
    let mut config = test_config();
    config.bootstrap.system_password = Some(SYSTEM_PASSWORD.to_string());
    config
}

impl TestSession {
    /// Open a session over an empty backend and cache
    pub async fn open() -> Self {
        Self::open_with(
            MemoryRemoteDirectory::new(),
            Arc::new(MemoryCacheStore::default()),
            test_config(),
        )
        .await
    }

    /// Open a session over existing backend and cache state
    pub async fn open_with(
        remote: MemoryRemoteDirectory,
        cache: Arc<MemoryCacheStore>,
        config: AppConfig,
    ) -> Self {
        let session = SessionContext::open(config, Arc::new(remote.clone()), cache.clone())
            .await
            .expect("Failed to open session");
        Self {
            remote,
            cache,
            session,
        }
    }

    /// Navigate to root
    pub async fn at_root(&self) {
        self.session
            .navigate(&ItemId::root())
            .await
            .expect("Failed to load root");
    }

    /// Names shown in the explorer, in display order
    pub async fn shown_names(&self) -> Vec<String> {
        self.session
            .explorer()
            .items()
            .await
            .into_iter()
            .map(|item| item.name)
            .collect()
    }

    /// Ids shown in the explorer
    pub async fn shown_ids(&self) -> Vec<ItemId> {
        self.session
            .explorer()
            .items()
            .await
            .into_iter()
            .map(|item| item.id)
            .collect()
    }
}
