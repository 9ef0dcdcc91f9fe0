//! Shared fixtures for unit tests: an in-memory backend wired to a loader
//! and coordinator.

use std::sync::Arc;
use std::time::Duration;

use deskfs_cache::memory::MemoryCacheStore;
use deskfs_core::events::{DocumentKind, DomainEvent, EventBus, EventPayload, OperationEvent};
use deskfs_entity::folder::FolderMap;
use deskfs_entity::id::{DocumentId, ItemId};
use deskfs_remote::MemoryRemoteDirectory;

use crate::explorer::ExplorerState;
use crate::gate::SystemGate;
use crate::listing::ListingLoader;
use crate::ops::BulkCoordinator;
use crate::sync::SyncChannel;
use crate::tree::TreeIndex;

pub(crate) const SYSTEM_PASSWORD: &str = "letmein";
pub(crate) const RECYCLE_BIN: &str = "Recycle Bin";

pub(crate) struct Harness {
    pub remote: MemoryRemoteDirectory,
    pub tree: Arc<TreeIndex>,
    pub explorer: Arc<ExplorerState>,
    pub gate: Arc<SystemGate>,
    pub bus: EventBus,
    pub loader: Arc<ListingLoader>,
    pub coordinator: BulkCoordinator,
    pub system_folder: ItemId,
    // Keeps the trigger's command channel open.
    _channel: SyncChannel,
}

impl Harness {
    pub async fn new() -> Self {
        let remote = MemoryRemoteDirectory::new();
        let system_folder = remote.insert_folder(&ItemId::root(), "System").await;

        let cache = Arc::new(MemoryCacheStore::default());
        let bus = EventBus::default();
        let channel = SyncChannel::new(DocumentKind::TreeIndex, Duration::from_secs(5), bus.clone());
        let tree = Arc::new(TreeIndex::new(
            DocumentId::from("db"),
            FolderMap::new(),
            channel.trigger(),
        ));
        let explorer = Arc::new(ExplorerState::new());
        let gate = Arc::new(SystemGate::new(
            system_folder.clone(),
            Some(SYSTEM_PASSWORD.to_string()),
        ));
        let loader = Arc::new(ListingLoader::new(
            Arc::new(remote.clone()),
            cache,
            tree.clone(),
            explorer.clone(),
            gate.clone(),
            RECYCLE_BIN,
        ));
        let coordinator = BulkCoordinator::new(
            Arc::new(remote.clone()),
            tree.clone(),
            explorer.clone(),
            loader.clone(),
            gate.clone(),
            bus.clone(),
            RECYCLE_BIN,
        );

        Self {
            remote,
            tree,
            explorer,
            gate,
            bus,
            loader,
            coordinator,
            system_folder,
            _channel: channel,
        }
    }

    /// Names of the items currently shown, in display order.
    pub async fn shown_names(&self) -> Vec<String> {
        self.explorer
            .items()
            .await
            .into_iter()
            .map(|item| item.name)
            .collect()
    }
}

/// Drain every operation event received so far.
pub(crate) fn operation_events(
    rx: &mut tokio::sync::broadcast::Receiver<DomainEvent>,
) -> Vec<OperationEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let EventPayload::Operation(op) = event.payload {
            events.push(op);
        }
    }
    events
}
