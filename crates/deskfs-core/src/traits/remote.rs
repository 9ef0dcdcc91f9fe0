//! Remote directory trait for the flat object-storage backend.

use async_trait::async_trait;
use bytes::Bytes;

use deskfs_entity::bootstrap::BootstrapProbe;
use deskfs_entity::id::{DocumentId, ItemId};
use deskfs_entity::remote::{CreatedFolder, DriveFileDescriptor, FolderListing};

use crate::config::bootstrap::BootstrapConfig;
use crate::result::AppResult;

/// Trait for the remote storage backend.
///
/// The backend only knows flat per-folder listings and upload/move/rename
/// primitives; it has no tree. Every failure surfaces as an
/// [`AppError`](crate::AppError) of kind `Network` carrying the backend's
/// message. Implementations exist for JSON-over-HTTP and for an in-process
/// object store in `deskfs-remote`.
#[async_trait]
pub trait RemoteDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. "http", "memory").
    fn provider_type(&self) -> &str;

    /// List the direct children of a folder.
    async fn list_folder(&self, folder_id: &ItemId) -> AppResult<FolderListing>;

    /// Create a folder under `parent_id`.
    async fn create_folder(&self, parent_id: &ItemId, name: &str) -> AppResult<CreatedFolder>;

    /// Re-parent items into `target_folder_id`.
    async fn move_items(&self, ids: &[ItemId], target_folder_id: &ItemId) -> AppResult<()>;

    /// Rename a single item.
    async fn rename_item(&self, id: &ItemId, new_name: &str) -> AppResult<()>;

    /// Copy items next to the originals.
    async fn duplicate_items(&self, ids: &[ItemId]) -> AppResult<()>;

    /// Permanently delete items.
    async fn delete_items(&self, ids: &[ItemId]) -> AppResult<()>;

    /// Upload a file into `folder_id`.
    async fn upload_file(
        &self,
        bytes: Bytes,
        name: &str,
        mime_type: &str,
        folder_id: &ItemId,
    ) -> AppResult<DriveFileDescriptor>;

    /// Read a JSON document as raw text.
    async fn read_document(&self, document_id: &DocumentId) -> AppResult<String>;

    /// Overwrite a JSON document whole.
    async fn write_document(&self, document_id: &DocumentId, content: &str) -> AppResult<()>;

    /// Probe for the well-known system folder and documents.
    async fn locate_system_bootstrap(&self, names: &BootstrapConfig) -> AppResult<BootstrapProbe>;
}
