//! Bulk operations on the explorer selection.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use deskfs_core::error::AppError;
use deskfs_core::events::{EventBus, OperationEvent};
use deskfs_core::result::AppResult;
use deskfs_core::traits::remote::RemoteDirectory;
use deskfs_entity::folder::FolderEntryUpdate;
use deskfs_entity::id::ItemId;
use deskfs_entity::item::{Item, ItemKind};
use deskfs_entity::remote::DriveFileDescriptor;

use super::command::{MoveCommand, UploadCommand, run_optimistic};
use crate::explorer::ExplorerState;
use crate::gate::SystemGate;
use crate::listing::{ListingLoader, ListingOutcome};
use crate::tree::TreeIndex;

/// MIME type used for notes.
pub const NOTE_MIME_TYPE: &str = "text/plain";

/// Runs user-triggered mutations against the backend.
///
/// Every operation publishes `Started` and then `Succeeded` or `Failed` on
/// the event bus. Failures leave local state as it was before the call.
/// Operations are not serialised against each other; the reload after
/// each one re-derives the view from the backend.
#[derive(Debug)]
pub struct BulkCoordinator {
    remote: Arc<dyn RemoteDirectory>,
    tree: Arc<TreeIndex>,
    explorer: Arc<ExplorerState>,
    loader: Arc<ListingLoader>,
    gate: Arc<SystemGate>,
    bus: EventBus,
    recycle_bin_name: String,
}

impl BulkCoordinator {
    /// Create a coordinator.
    pub fn new(
        remote: Arc<dyn RemoteDirectory>,
        tree: Arc<TreeIndex>,
        explorer: Arc<ExplorerState>,
        loader: Arc<ListingLoader>,
        gate: Arc<SystemGate>,
        bus: EventBus,
        recycle_bin_name: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            tree,
            explorer,
            loader,
            gate,
            bus,
            recycle_bin_name: recycle_bin_name.into(),
        }
    }

    /// Move items into `target_id`.
    ///
    /// Items are flagged `Moving` until the backend answers. On success the
    /// tree index records the new parent of every moved folder and the
    /// current folder is reloaded; on failure the item list is restored.
    pub async fn move_items(&self, ids: &[ItemId], target_id: &ItemId) -> AppResult<()> {
        let label = format!("Moving {}", describe(ids));
        self.tracked(label, self.relocate(ids, target_id)).await
    }

    /// Move the current selection into `target_id`.
    pub async fn move_selection(&self, target_id: &ItemId) -> AppResult<()> {
        let ids = self.explorer.selection().await;
        self.move_items(&ids, target_id).await
    }

    /// Soft-delete items by moving them into the recycle bin, creating the
    /// bin first if none is known.
    pub async fn delete_items(&self, ids: &[ItemId]) -> AppResult<()> {
        let label = format!("Deleting {}", describe(ids));
        self.tracked(label, async {
            require_selection(ids)?;
            let bin = self.ensure_recycle_bin().await?;
            if ids.contains(&bin) {
                return Err(AppError::validation("The recycle bin cannot be deleted"));
            }
            self.relocate(ids, &bin).await
        })
        .await
    }

    /// Soft-delete the current selection.
    pub async fn delete_selection(&self) -> AppResult<()> {
        let ids = self.explorer.selection().await;
        self.delete_items(&ids).await
    }

    /// Copy items next to the originals.
    pub async fn duplicate_items(&self, ids: &[ItemId]) -> AppResult<()> {
        let label = format!("Duplicating {}", describe(ids));
        self.tracked(label, async {
            require_selection(ids)?;
            self.remote.duplicate_items(ids).await?;
            self.reload_after("duplicate").await;
            Ok(())
        })
        .await
    }

    /// Rename one item.
    ///
    /// Nothing changes locally until the backend confirms.
    pub async fn rename_item(&self, id: &ItemId, new_name: &str) -> AppResult<()> {
        let new_name = new_name.trim();
        let label = format!("Renaming to \"{new_name}\"");
        self.tracked(label, async {
            if new_name.is_empty() {
                return Err(AppError::validation("Name cannot be empty"));
            }
            if self.gate.is_system(id) {
                return Err(AppError::permission_denied(
                    "The system folder cannot be renamed",
                ));
            }

            self.remote.rename_item(id, new_name).await?;
            if self.tree.get(id).await.is_some() {
                self.tree
                    .upsert_many([FolderEntryUpdate::name_only(id.clone(), new_name)])
                    .await;
            }
            self.reload_after("rename").await;
            Ok(())
        })
        .await
    }

    /// Create a folder in the current folder and return its id.
    pub async fn create_folder(&self, name: &str) -> AppResult<ItemId> {
        let name = name.trim();
        let label = format!("Creating folder \"{name}\"");
        self.tracked(label, async {
            if name.is_empty() {
                return Err(AppError::validation("Folder name cannot be empty"));
            }
            let parent = self.explorer.current_folder().await;
            let created = self.remote.create_folder(&parent, name).await?;
            self.tree
                .upsert_many([FolderEntryUpdate::with_parent(
                    created.id.clone(),
                    created.name,
                    parent,
                )])
                .await;
            self.reload_after("create folder").await;
            Ok(created.id)
        })
        .await
    }

    /// Upload a file into the current folder.
    pub async fn upload_file(
        &self,
        bytes: Bytes,
        name: &str,
        mime_type: &str,
    ) -> AppResult<DriveFileDescriptor> {
        let name = name.trim();
        let label = format!("Uploading \"{name}\"");
        self.tracked(label, async {
            if name.is_empty() {
                return Err(AppError::validation("File name cannot be empty"));
            }
            let folder = self.explorer.current_folder().await;
            let kind = if mime_type.starts_with("image/") {
                ItemKind::Image
            } else {
                ItemKind::Note
            };
            let placeholder = Item::new(format!("pending-{}", Uuid::new_v4()), kind, name);
            let command = UploadCommand::new(placeholder, bytes, mime_type.to_string(), folder);

            let descriptor =
                run_optimistic(&command, &self.explorer, self.remote.as_ref()).await?;
            self.reload_after("upload").await;
            Ok(descriptor)
        })
        .await
    }

    /// Save a text note into the current folder.
    pub async fn save_note(&self, name: &str, text: &str) -> AppResult<DriveFileDescriptor> {
        self.upload_file(Bytes::copy_from_slice(text.as_bytes()), name, NOTE_MIME_TYPE)
            .await
    }

    /// Permanently delete items that are in the recycle bin.
    pub async fn purge(&self, ids: &[ItemId]) -> AppResult<()> {
        let label = format!("Permanently deleting {}", describe(ids));
        self.tracked(label, async {
            require_selection(ids)?;
            let bin = self.explorer.recycle_bin_id().await;
            let current = self.explorer.current_folder().await;
            if bin.as_ref() != Some(&current) {
                return Err(AppError::validation(
                    "Only items in the recycle bin can be permanently deleted",
                ));
            }
            let shown = self.explorer.items().await;
            if let Some(stray) = ids.iter().find(|id| !shown.iter().any(|item| &item.id == *id)) {
                return Err(AppError::validation(format!(
                    "Item {stray} is not in the recycle bin"
                )));
            }
            self.destroy(ids).await?;
            self.reload_after("purge").await;
            Ok(())
        })
        .await
    }

    /// Permanently delete everything in the recycle bin. Returns the
    /// number of top-level items removed.
    pub async fn empty_recycle_bin(&self) -> AppResult<usize> {
        self.tracked("Emptying recycle bin".to_string(), async {
            let Some(bin) = self.explorer.recycle_bin_id().await else {
                return Ok(0);
            };
            let listing = self.remote.list_folder(&bin).await?;
            let ids: Vec<ItemId> = listing.items.into_iter().map(|item| item.id).collect();
            if ids.is_empty() {
                return Ok(0);
            }
            self.destroy(&ids).await?;
            if self.explorer.current_folder().await == bin {
                self.reload_after("empty recycle bin").await;
            }
            Ok(ids.len())
        })
        .await
    }

    async fn relocate(&self, ids: &[ItemId], target_id: &ItemId) -> AppResult<()> {
        require_selection(ids)?;
        self.gate.check_move_target(target_id)?;
        if ids.iter().any(|id| self.gate.is_system(id)) {
            return Err(AppError::permission_denied(
                "The system folder cannot be moved",
            ));
        }
        if ids.contains(target_id) {
            return Err(AppError::validation("A folder cannot be moved into itself"));
        }
        for id in ids {
            if self.tree.is_descendant(target_id, id).await {
                return Err(AppError::validation(
                    "A folder cannot be moved into its own subfolder",
                ));
            }
        }

        let moved_folders: Vec<Item> = self
            .explorer
            .items()
            .await
            .into_iter()
            .filter(|item| item.is_folder() && ids.contains(&item.id))
            .collect();

        let command = MoveCommand::new(ids.to_vec(), target_id.clone());
        run_optimistic(&command, &self.explorer, self.remote.as_ref()).await?;

        for id in ids {
            if self.tree.reparent(id, target_id).await {
                continue;
            }
            if let Some(folder) = moved_folders.iter().find(|item| &item.id == id) {
                self.tree
                    .upsert_many([FolderEntryUpdate::with_parent(
                        folder.id.clone(),
                        folder.name.clone(),
                        target_id.clone(),
                    )])
                    .await;
            }
        }

        self.reload_after("move").await;
        Ok(())
    }

    async fn destroy(&self, ids: &[ItemId]) -> AppResult<()> {
        if ids.iter().any(|id| self.gate.is_system(id)) {
            return Err(AppError::permission_denied(
                "The system folder cannot be deleted",
            ));
        }
        self.remote.delete_items(ids).await?;
        for id in ids {
            self.tree.remove_subtree(id).await;
        }
        Ok(())
    }

    /// Find the recycle bin in root, or create it.
    async fn ensure_recycle_bin(&self) -> AppResult<ItemId> {
        if let Some(bin) = self.explorer.recycle_bin_id().await {
            return Ok(bin);
        }

        let root = self.remote.list_folder(&ItemId::root()).await?;
        let found = root
            .items
            .into_iter()
            .find(|item| item.is_folder() && item.name == self.recycle_bin_name);

        let (id, name) = match found {
            Some(item) => (item.id, item.name),
            None => {
                let created = self
                    .remote
                    .create_folder(&ItemId::root(), &self.recycle_bin_name)
                    .await?;
                info!(folder_id = %created.id, "Created recycle bin");
                (created.id, created.name)
            }
        };

        self.tree
            .upsert_many([FolderEntryUpdate::with_parent(id.clone(), name, ItemId::root())])
            .await;
        self.explorer.set_recycle_bin(Some(id.clone())).await;
        Ok(id)
    }

    async fn reload_after(&self, operation: &str) {
        if let ListingOutcome::KeptStale { message } = self.loader.reload().await {
            warn!(operation, error = %message, "Reload after operation failed");
        }
    }

    async fn tracked<T, F>(&self, label: String, operation: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        self.bus.operation(OperationEvent::started(label.clone()));
        match operation.await {
            Ok(value) => {
                info!(operation = %label, "Operation succeeded");
                self.bus.operation(OperationEvent::succeeded(label));
                Ok(value)
            }
            Err(e) => {
                warn!(operation = %label, error = %e, "Operation failed");
                self.bus
                    .operation(OperationEvent::failed(label, e.message.clone()));
                Err(e)
            }
        }
    }
}

fn require_selection(ids: &[ItemId]) -> AppResult<()> {
    if ids.is_empty() {
        return Err(AppError::validation("No items selected"));
    }
    Ok(())
}

fn describe(ids: &[ItemId]) -> String {
    match ids.len() {
        1 => "1 item".to_string(),
        n => format!("{n} items"),
    }
}
