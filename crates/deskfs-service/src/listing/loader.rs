//! Folder navigation: serve the cached listing, then fetch remote truth.

use std::sync::Arc;

use tracing::{debug, info, warn};

use deskfs_cache::keys;
use deskfs_core::result::AppResult;
use deskfs_core::traits::cache::LocalCacheStore;
use deskfs_core::traits::remote::RemoteDirectory;
use deskfs_entity::folder::FolderEntryUpdate;
use deskfs_entity::id::ItemId;
use deskfs_entity::item::Item;

use super::collation::sort_items;
use crate::explorer::{ExplorerState, NavigationToken};
use crate::gate::SystemGate;
use crate::tree::TreeIndex;

/// How a navigation or reload ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutcome {
    /// The remote listing was applied.
    Loaded {
        /// Number of items in the folder.
        count: usize,
    },
    /// The user navigated elsewhere before the response arrived.
    Discarded,
    /// The remote call failed; whatever was shown stays on screen.
    KeptStale {
        /// The error message, for logging by the caller.
        message: String,
    },
}

/// Loads folder listings into the explorer, the cache, and the tree index.
#[derive(Debug)]
pub struct ListingLoader {
    remote: Arc<dyn RemoteDirectory>,
    cache: Arc<dyn LocalCacheStore>,
    tree: Arc<TreeIndex>,
    explorer: Arc<ExplorerState>,
    gate: Arc<SystemGate>,
    recycle_bin_name: String,
}

impl ListingLoader {
    /// Create a loader.
    pub fn new(
        remote: Arc<dyn RemoteDirectory>,
        cache: Arc<dyn LocalCacheStore>,
        tree: Arc<TreeIndex>,
        explorer: Arc<ExplorerState>,
        gate: Arc<SystemGate>,
        recycle_bin_name: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            cache,
            tree,
            explorer,
            gate,
            recycle_bin_name: recycle_bin_name.into(),
        }
    }

    /// Navigate to a folder.
    ///
    /// A cached listing is shown immediately; the remote listing replaces
    /// it when it arrives. Only a locked system folder produces an error.
    pub async fn navigate(&self, folder_id: &ItemId) -> AppResult<ListingOutcome> {
        self.gate.check_navigation(folder_id)?;

        let token = self.explorer.begin_navigation(folder_id).await;
        if let Some(cached) = self.cached_listing(folder_id).await {
            debug!(folder_id = %folder_id, count = cached.len(), "Serving cached listing");
            self.explorer.show_items(token, cached).await;
        }

        Ok(self.fetch(folder_id, token).await)
    }

    /// Fetch the current folder again.
    pub async fn reload(&self) -> ListingOutcome {
        let token = self.explorer.current_token().await;
        let folder_id = self.explorer.current_folder().await;
        self.fetch(&folder_id, token).await
    }

    /// Read a folder's listing from the cache. Read errors count as a miss.
    pub async fn cached_listing(&self, folder_id: &ItemId) -> Option<Vec<Item>> {
        match self.cache.get_cached_folder(&keys::folder_key(folder_id)).await {
            Ok(found) => found,
            Err(e) => {
                debug!(folder_id = %folder_id, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    async fn fetch(&self, folder_id: &ItemId, token: NavigationToken) -> ListingOutcome {
        let listing = match self.remote.list_folder(folder_id).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!(folder_id = %folder_id, error = %e, "Folder listing failed, keeping stale view");
                self.explorer.finish_loading(token).await;
                return ListingOutcome::KeptStale { message: e.message };
            }
        };

        if !self.explorer.is_current(token).await {
            debug!(folder_id = %folder_id, "Discarding listing for inactive navigation");
            return ListingOutcome::Discarded;
        }

        let mut items = listing.items;
        sort_items(&mut items);

        if folder_id.is_root() {
            let bin = items
                .iter()
                .find(|item| item.is_folder() && item.name == self.recycle_bin_name)
                .map(|item| item.id.clone());
            self.explorer.set_recycle_bin(bin).await;
        }

        if let Err(e) = self
            .cache
            .put_cached_folder(&keys::folder_key(folder_id), &items)
            .await
        {
            warn!(folder_id = %folder_id, error = %e, "Failed to cache folder listing");
        }

        let folders = items
            .iter()
            .filter(|item| item.is_folder())
            .map(|item| {
                FolderEntryUpdate::with_parent(item.id.clone(), item.name.clone(), folder_id.clone())
            });
        self.tree.upsert_many(folders).await;

        let count = items.len();
        if !self.explorer.show_items(token, items).await {
            return ListingOutcome::Discarded;
        }
        info!(folder_id = %folder_id, count, "Folder loaded");
        ListingOutcome::Loaded { count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use deskfs_core::error::ErrorKind;
    use deskfs_entity::item::ItemKind;
    use deskfs_remote::RemoteOp;

    use crate::testing::{Harness, RECYCLE_BIN, SYSTEM_PASSWORD};

    #[tokio::test]
    async fn test_navigate_loads_sorted_listing() {
        let h = Harness::new().await;
        h.remote.insert_folder(&ItemId::root(), "folder10").await;
        h.remote.insert_folder(&ItemId::root(), "folder2").await;
        h.remote
            .insert(&ItemId::root(), Item::new("n-1", ItemKind::Note, "a note"))
            .await;

        let outcome = h.loader.navigate(&ItemId::root()).await.unwrap();
        assert_eq!(outcome, ListingOutcome::Loaded { count: 4 });
        assert_eq!(
            h.shown_names().await,
            vec!["a note", "folder2", "folder10", "System"]
        );
        assert!(!h.explorer.view().await.loading);
    }

    #[tokio::test]
    async fn test_navigate_records_folders_and_caches_listing() {
        let h = Harness::new().await;
        let docs = h.remote.insert_folder(&ItemId::root(), "Docs").await;
        let work = h.remote.insert_folder(&docs, "Work").await;

        h.loader.navigate(&ItemId::root()).await.unwrap();
        h.loader.navigate(&docs).await.unwrap();

        assert_eq!(h.tree.get(&docs).await.unwrap().parent_id, ItemId::root());
        assert_eq!(h.tree.get(&work).await.unwrap().parent_id, docs);
        let cached = h.loader.cached_listing(&docs).await.unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].id, work);
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_cached_view() {
        let h = Harness::new().await;
        h.remote.insert_folder(&ItemId::root(), "Docs").await;
        h.loader.navigate(&ItemId::root()).await.unwrap();

        h.remote.fail(RemoteOp::ListFolder).await;
        let outcome = h.loader.navigate(&ItemId::root()).await.unwrap();
        assert!(matches!(outcome, ListingOutcome::KeptStale { .. }));
        assert_eq!(h.shown_names().await, vec!["Docs", "System"]);
        assert!(!h.explorer.view().await.loading);
    }

    #[tokio::test]
    async fn test_uncached_failure_shows_empty_folder() {
        let h = Harness::new().await;
        h.remote.fail(RemoteOp::ListFolder).await;
        let outcome = h.loader.navigate(&ItemId::root()).await.unwrap();
        assert!(matches!(outcome, ListingOutcome::KeptStale { .. }));
        assert!(h.explorer.items().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_navigation_is_discarded() {
        let h = Harness::new().await;
        let a = h.remote.insert_folder(&ItemId::root(), "A").await;
        let b = h.remote.insert_folder(&ItemId::root(), "B").await;
        let inside_a = h.remote.insert_folder(&a, "Inside A").await;
        h.remote.insert_folder(&b, "Inside B").await;
        h.remote.set_latency(Duration::from_millis(100)).await;

        let loader = h.loader.clone();
        let target = a.clone();
        let first = tokio::spawn(async move { loader.navigate(&target).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = h.loader.navigate(&b).await.unwrap();

        assert_eq!(first.await.unwrap().unwrap(), ListingOutcome::Discarded);
        assert_eq!(second, ListingOutcome::Loaded { count: 1 });
        assert_eq!(h.explorer.current_folder().await, b);
        assert_eq!(h.shown_names().await, vec!["Inside B"]);
        assert!(h.tree.get(&inside_a).await.is_none());
        assert!(h.loader.cached_listing(&a).await.is_none());
    }

    #[tokio::test]
    async fn test_root_listing_detects_recycle_bin() {
        let h = Harness::new().await;
        let bin = h.remote.insert_folder(&ItemId::root(), RECYCLE_BIN).await;
        h.loader.navigate(&ItemId::root()).await.unwrap();
        assert_eq!(h.explorer.recycle_bin_id().await, Some(bin));
    }

    #[tokio::test]
    async fn test_locked_system_folder_is_refused() {
        let h = Harness::new().await;
        let err = h.loader.navigate(&h.system_folder).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::PermissionDenied);
        assert!(h.explorer.current_folder().await.is_root());

        h.gate.unlock(SYSTEM_PASSWORD).unwrap();
        assert!(h.loader.navigate(&h.system_folder).await.is_ok());
    }

    #[tokio::test]
    async fn test_reload_refreshes_current_folder() {
        let h = Harness::new().await;
        h.loader.navigate(&ItemId::root()).await.unwrap();
        h.remote.insert_folder(&ItemId::root(), "Later").await;

        assert_eq!(h.loader.reload().await, ListingOutcome::Loaded { count: 2 });
        assert_eq!(h.shown_names().await, vec!["Later", "System"]);
    }
}
