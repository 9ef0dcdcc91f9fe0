//! The running session: every component wired to the same tree index,
//! comment store, and explorer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use deskfs_core::config::AppConfig;
use deskfs_core::events::{DocumentKind, EventBus, SyncPhase};
use deskfs_core::result::AppResult;
use deskfs_core::traits::cache::LocalCacheStore;
use deskfs_core::traits::remote::RemoteDirectory;
use deskfs_entity::bootstrap::BootstrapState;
use deskfs_entity::comment::CommentDb;
use deskfs_entity::folder::FolderMap;
use deskfs_entity::id::ItemId;

use crate::bootstrap::BootstrapService;
use crate::comments::{CommentRefresher, CommentStore};
use crate::drag::DragMachine;
use crate::explorer::ExplorerState;
use crate::gate::SystemGate;
use crate::listing::{ListingLoader, ListingOutcome};
use crate::ops::BulkCoordinator;
use crate::sync::{SyncChannel, decode_document};
use crate::tree::TreeIndex;

/// Session-wide state, constructed once and passed by reference.
///
/// The tree index and the comment store each have a single sync worker
/// writing them remotely. [`SessionContext::flush`] forces both workers to
/// write now; [`SessionContext::reload`] pulls both remote documents.
#[derive(Debug)]
pub struct SessionContext {
    config: AppConfig,
    bootstrap: BootstrapState,
    remote: Arc<dyn RemoteDirectory>,
    cache: Arc<dyn LocalCacheStore>,
    bus: EventBus,
    gate: Arc<SystemGate>,
    tree: Arc<TreeIndex>,
    comments: Arc<CommentStore>,
    explorer: Arc<ExplorerState>,
    loader: Arc<ListingLoader>,
    coordinator: Arc<BulkCoordinator>,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SessionContext {
    /// Open a session with a fresh event bus.
    pub async fn open(
        config: AppConfig,
        remote: Arc<dyn RemoteDirectory>,
        cache: Arc<dyn LocalCacheStore>,
    ) -> AppResult<Self> {
        Self::open_with_bus(config, remote, cache, EventBus::default()).await
    }

    /// Open a session publishing on `bus`.
    ///
    /// Resolves the bootstrap state, seeds both documents from the local
    /// cache, starts the sync workers, and then reconciles with the remote
    /// documents. An unreachable document leaves the cached copy in place.
    pub async fn open_with_bus(
        config: AppConfig,
        remote: Arc<dyn RemoteDirectory>,
        cache: Arc<dyn LocalCacheStore>,
        bus: EventBus,
    ) -> AppResult<Self> {
        // ── Step 1: Bootstrap ──
        let bootstrap = BootstrapService::new(remote.clone(), config.bootstrap.clone())
            .resolve()
            .await?;
        info!(
            system_folder_id = %bootstrap.system_folder_id,
            db_document_id = %bootstrap.db_document_id,
            comment_document_id = %bootstrap.comment_document_id,
            "Bootstrap resolved"
        );

        // ── Step 2: Seed from local cache ──
        let tree_seed = match cache.get_tree_snapshot().await {
            Ok(Some(snapshot)) if snapshot.document_id == bootstrap.db_document_id => snapshot.map,
            Ok(_) => FolderMap::new(),
            Err(e) => {
                debug!(error = %e, "Tree snapshot unreadable, starting cold");
                FolderMap::new()
            }
        };
        let comment_seed = match cache.get_comment_snapshot().await {
            Ok(Some(snapshot)) if snapshot.document_id == bootstrap.comment_document_id => {
                snapshot.comments
            }
            Ok(_) => CommentDb::new(),
            Err(e) => {
                debug!(error = %e, "Comment snapshot unreadable, starting cold");
                CommentDb::new()
            }
        };

        // ── Step 3: Documents and sync workers ──
        let (shutdown, shutdown_rx) = watch::channel(false);
        let mut tasks = Vec::new();

        let tree_channel = SyncChannel::new(
            DocumentKind::TreeIndex,
            config.sync.tree_debounce(),
            bus.clone(),
        );
        let tree = Arc::new(TreeIndex::new(
            bootstrap.db_document_id.clone(),
            tree_seed,
            tree_channel.trigger(),
        ));
        let worker = tree_channel.into_worker(
            tree.clone(),
            remote.clone(),
            cache.clone(),
            bootstrap.db_document_id.clone(),
        );
        tasks.push(tokio::spawn(worker.run(shutdown_rx.clone())));

        let comment_channel = SyncChannel::new(
            DocumentKind::Comments,
            config.sync.comment_debounce(),
            bus.clone(),
        );
        let comments = Arc::new(CommentStore::new(
            bootstrap.comment_document_id.clone(),
            comment_seed,
            comment_channel.trigger(),
        ));
        let worker = comment_channel.into_worker(
            comments.clone(),
            remote.clone(),
            cache.clone(),
            bootstrap.comment_document_id.clone(),
        );
        tasks.push(tokio::spawn(worker.run(shutdown_rx.clone())));

        // ── Step 4: Explorer, loader, coordinator ──
        let gate = Arc::new(SystemGate::new(
            bootstrap.system_folder_id.clone(),
            config.bootstrap.system_password.clone(),
        ));
        let explorer = Arc::new(ExplorerState::new());
        let loader = Arc::new(ListingLoader::new(
            remote.clone(),
            cache.clone(),
            tree.clone(),
            explorer.clone(),
            gate.clone(),
            config.bootstrap.recycle_bin_name.clone(),
        ));
        let coordinator = Arc::new(BulkCoordinator::new(
            remote.clone(),
            tree.clone(),
            explorer.clone(),
            loader.clone(),
            gate.clone(),
            bus.clone(),
            config.bootstrap.recycle_bin_name.clone(),
        ));

        let session = Self {
            config,
            bootstrap,
            remote,
            cache,
            bus,
            gate,
            tree,
            comments,
            explorer,
            loader,
            coordinator,
            shutdown,
            tasks: Mutex::new(tasks),
        };

        // ── Step 5: Reconcile with remote documents ──
        if let Err(e) = session.reload().await {
            warn!(error = %e, "Remote documents unavailable, continuing with cached state");
        }

        // ── Step 6: Periodic comment refresh ──
        if session.config.sync.comment_refresh_seconds > 0 {
            let refresher = CommentRefresher::new(
                session.comments.clone(),
                session.remote.clone(),
                Duration::from_secs(session.config.sync.comment_refresh_seconds),
            );
            session
                .tasks
                .lock()
                .await
                .push(tokio::spawn(refresher.run(shutdown_rx)));
        }

        info!(
            folders = session.tree.len().await,
            remote = session.remote.provider_type(),
            cache = session.cache.provider_type(),
            "Session opened"
        );
        Ok(session)
    }

    /// Write both documents now, skipping any that is clean.
    pub async fn flush(&self) -> AppResult<()> {
        let tree = self.tree.sync().flush_now().await;
        let comments = self.comments.sync().flush_now().await;
        tree.and(comments)
    }

    /// Re-read both remote documents.
    ///
    /// A document with unflushed local changes keeps them, including changes
    /// made while the read was in flight. A corrupt remote document is
    /// ignored and scheduled to be overwritten with the local copy.
    pub async fn reload(&self) -> AppResult<()> {
        if self.tree.sync().is_dirty() {
            debug!("Tree index has local changes, not reloading");
        } else {
            let read_at = self.tree.sync().revision();
            let raw = self.remote.read_document(&self.bootstrap.db_document_id).await?;
            match decode_document::<FolderMap>(DocumentKind::TreeIndex, &raw) {
                Ok(map) => {
                    if !self.tree.replace_from_remote(map, read_at).await {
                        debug!("Tree index changed during reload, keeping local copy");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Falling back to local tree index");
                    self.tree.sync().mark_dirty();
                }
            }
        }

        if self.comments.sync().is_dirty() {
            debug!("Comments have local changes, not reloading");
        } else {
            let read_at = self.comments.sync().revision();
            let raw = self
                .remote
                .read_document(&self.bootstrap.comment_document_id)
                .await?;
            match decode_document::<CommentDb>(DocumentKind::Comments, &raw) {
                Ok(db) => {
                    if !self.comments.replace_from_remote(db, read_at).await {
                        debug!("Comments changed during reload, keeping local copy");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Falling back to local comments");
                    self.comments.sync().mark_dirty();
                }
            }
        }
        Ok(())
    }

    /// Flush, stop background tasks, and wait for them to finish.
    pub async fn close(self) -> AppResult<()> {
        let flushed = self.flush().await;
        let _ = self.shutdown.send(true);

        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Background task ended abnormally");
            }
        }
        info!("Session closed");
        flushed
    }

    /// Navigate the explorer to a folder.
    pub async fn navigate(&self, folder_id: &ItemId) -> AppResult<ListingOutcome> {
        self.loader.navigate(folder_id).await
    }

    /// Unlock the system folder.
    pub fn unlock_system(&self, password: &str) -> AppResult<()> {
        self.gate.unlock(password)
    }

    /// Phases of the tree and comment sync channels.
    pub fn sync_status(&self) -> (SyncPhase, SyncPhase) {
        (self.tree.sync().phase(), self.comments.sync().phase())
    }

    /// A drag machine for this session's explorer.
    pub fn drag_machine(&self) -> DragMachine {
        DragMachine::new(
            self.config.drag.clone(),
            self.bootstrap.system_folder_id.clone(),
        )
    }

    /// Effective configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Resolved bootstrap ids.
    pub fn bootstrap(&self) -> &BootstrapState {
        &self.bootstrap
    }

    /// Event bus for operation and sync notifications.
    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// The tree index.
    pub fn tree(&self) -> &Arc<TreeIndex> {
        &self.tree
    }

    /// The comment store.
    pub fn comments(&self) -> &Arc<CommentStore> {
        &self.comments
    }

    /// The explorer state.
    pub fn explorer(&self) -> &Arc<ExplorerState> {
        &self.explorer
    }

    /// The listing loader.
    pub fn loader(&self) -> &Arc<ListingLoader> {
        &self.loader
    }

    /// The bulk operation coordinator.
    pub fn coordinator(&self) -> &Arc<BulkCoordinator> {
        &self.coordinator
    }

    /// The system folder gate.
    pub fn gate(&self) -> &Arc<SystemGate> {
        &self.gate
    }

    /// The remote directory.
    pub fn remote(&self) -> &Arc<dyn RemoteDirectory> {
        &self.remote
    }

    /// The local cache store.
    pub fn cache(&self) -> &Arc<dyn LocalCacheStore> {
        &self.cache
    }
}
