//! Folder map entry model.

use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// One entry of the folder map: the only record of where a folder lives,
/// since the backend has no hierarchy of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    /// Folder identifier.
    pub id: ItemId,
    /// Folder display name.
    pub name: String,
    /// Parent folder. Root is [`ItemId::root`].
    pub parent_id: ItemId,
}

impl FolderEntry {
    /// Create a new entry.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, parent_id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: parent_id.into(),
        }
    }

    /// Check if this folder sits directly under root.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_root()
    }
}

/// A merge request for one folder map entry.
///
/// When the entry already exists, `parent_id: None` keeps the stored parent.
/// A listing always supplies the parent it observed; callers that only know
/// a name (e.g. rename) leave it unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntryUpdate {
    /// Folder identifier.
    pub id: ItemId,
    /// Folder display name.
    pub name: String,
    /// Parent to record, if known.
    pub parent_id: Option<ItemId>,
}

impl FolderEntryUpdate {
    /// An update that also records the parent.
    pub fn with_parent(id: ItemId, name: impl Into<String>, parent_id: ItemId) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: Some(parent_id),
        }
    }

    /// An update of the name only.
    pub fn name_only(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
        }
    }
}
