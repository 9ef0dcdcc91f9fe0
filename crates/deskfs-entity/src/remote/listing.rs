//! Remote response payloads.

use serde::{Deserialize, Serialize};

use crate::id::ItemId;
use crate::item::Item;

/// Response of a folder listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderListing {
    /// Backend status string (`"success"` on success).
    pub status: String,
    /// Children of the folder. May be empty.
    #[serde(default)]
    pub items: Vec<Item>,
    /// Parent of the listed folder, when the backend reports it.
    #[serde(default)]
    pub parent_folder_id: Option<ItemId>,
}

/// Response data of a folder creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedFolder {
    /// New folder id.
    pub id: ItemId,
    /// Name as stored.
    pub name: String,
}

/// Descriptor of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileDescriptor {
    /// New file id.
    pub id: ItemId,
    /// Name as stored.
    pub name: String,
    /// MIME type as stored.
    pub mime_type: String,
    /// Download URL, if the backend exposes one.
    #[serde(default)]
    pub url: Option<String>,
}
