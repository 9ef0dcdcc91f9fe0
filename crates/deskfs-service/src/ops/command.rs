//! Optimistic commands with pre-image rollback.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use deskfs_core::result::AppResult;
use deskfs_core::traits::remote::RemoteDirectory;
use deskfs_entity::id::ItemId;
use deskfs_entity::item::{Item, ItemStatus};
use deskfs_entity::remote::DriveFileDescriptor;

use crate::explorer::ExplorerState;

/// A change shown locally before the backend confirms it.
#[async_trait]
pub trait Command: Send + Sync {
    /// Value produced by the remote effect.
    type Output: Send;

    /// Apply the local transition to the explorer.
    async fn apply(&self, explorer: &ExplorerState);

    /// Perform the remote effect.
    async fn execute(&self, remote: &dyn RemoteDirectory) -> AppResult<Self::Output>;
}

/// Capture a pre-image, apply the command, run the remote effect, and
/// restore the pre-image if the effect fails.
pub async fn run_optimistic<C: Command>(
    command: &C,
    explorer: &ExplorerState,
    remote: &dyn RemoteDirectory,
) -> AppResult<C::Output> {
    let pre_image = explorer.capture().await;
    command.apply(explorer).await;

    match command.execute(remote).await {
        Ok(output) => Ok(output),
        Err(e) => {
            let restored = explorer.restore(pre_image).await;
            debug!(restored, "Rolled back optimistic change");
            Err(e)
        }
    }
}

/// Re-parent items, flagging them `Moving` meanwhile.
#[derive(Debug, Clone)]
pub struct MoveCommand {
    ids: Vec<ItemId>,
    target_id: ItemId,
}

impl MoveCommand {
    /// Move `ids` into `target_id`.
    pub fn new(ids: Vec<ItemId>, target_id: ItemId) -> Self {
        Self { ids, target_id }
    }
}

#[async_trait]
impl Command for MoveCommand {
    type Output = ();

    async fn apply(&self, explorer: &ExplorerState) {
        explorer.set_status(&self.ids, ItemStatus::Moving).await;
    }

    async fn execute(&self, remote: &dyn RemoteDirectory) -> AppResult<()> {
        remote.move_items(&self.ids, &self.target_id).await
    }
}

/// Upload a file, showing a `Creating` placeholder meanwhile.
#[derive(Debug, Clone)]
pub struct UploadCommand {
    placeholder: Item,
    bytes: Bytes,
    mime_type: String,
    folder_id: ItemId,
}

impl UploadCommand {
    /// Upload `bytes` as `placeholder.name` into `folder_id`.
    pub fn new(placeholder: Item, bytes: Bytes, mime_type: String, folder_id: ItemId) -> Self {
        Self {
            placeholder,
            bytes,
            mime_type,
            folder_id,
        }
    }
}

#[async_trait]
impl Command for UploadCommand {
    type Output = DriveFileDescriptor;

    async fn apply(&self, explorer: &ExplorerState) {
        let mut placeholder = self.placeholder.clone();
        placeholder.status = ItemStatus::Creating;
        explorer.push_placeholder(placeholder).await;
    }

    async fn execute(&self, remote: &dyn RemoteDirectory) -> AppResult<DriveFileDescriptor> {
        remote
            .upload_file(
                self.bytes.clone(),
                &self.placeholder.name,
                &self.mime_type,
                &self.folder_id,
            )
            .await
    }
}
