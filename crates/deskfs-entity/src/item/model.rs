//! Item entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// Kind of filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A folder.
    Folder,
    /// A plain-text note.
    Note,
    /// An image.
    Image,
}

impl ItemKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Note => "note",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transient operation state of an item. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// No operation pending.
    #[default]
    Idle,
    /// Placeholder for an upload or folder creation in flight.
    Creating,
    /// Part of a move (or delete-to-recycle-bin) in flight.
    Moving,
}

/// One filesystem entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Opaque identifier assigned by remote storage.
    pub id: ItemId,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Display name. Not unique.
    pub name: String,
    /// Inline text content, fetched lazily.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Download URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Last modification time set by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Transient operation state.
    #[serde(skip)]
    pub status: ItemStatus,
}

impl Item {
    /// Create an idle item with no payload references.
    pub fn new(id: impl Into<ItemId>, kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            content: None,
            url: None,
            thumbnail: None,
            last_updated: None,
            status: ItemStatus::Idle,
        }
    }

    /// Check if this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_not_serialized() {
        let mut item = Item::new("n1", ItemKind::Note, "Draft");
        item.status = ItemStatus::Moving;
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("status").is_none());
        assert_eq!(json["type"], "note");

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back.status, ItemStatus::Idle);
    }

    #[test]
    fn test_parses_wire_listing_entry() {
        let item: Item = serde_json::from_str(
            r#"{"id":"img-1","type":"image","name":"cat.png","thumbnail":"t://1","lastUpdated":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(item.kind, ItemKind::Image);
        assert_eq!(item.thumbnail.as_deref(), Some("t://1"));
        assert!(item.last_updated.is_some());
        assert!(!item.is_folder());
    }
}
