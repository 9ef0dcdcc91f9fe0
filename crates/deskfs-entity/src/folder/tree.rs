//! The tree-index document and display structures built from it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::FolderEntry;
use crate::id::{DocumentId, ItemId};

/// Folder id to entry. Serialises as the remote document
/// `{ "<folderId>": {id, name, parentId}, ... }`.
pub type FolderMap = BTreeMap<ItemId, FolderEntry>;

/// Locally cached copy of the tree index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    /// Remote document the map was read from or written to.
    pub document_id: DocumentId,
    /// The folder map.
    pub map: FolderMap,
    /// When the snapshot was last written remotely.
    pub last_sync_timestamp: DateTime<Utc>,
}

/// A node in a folder tree rendered from the folder map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: ItemId,
    /// Folder name.
    pub name: String,
    /// Depth level below the starting node.
    pub depth: usize,
    /// Child folder nodes.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Total number of nodes in this subtree, including this one.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(FolderNode::len).sum::<usize>()
    }

    /// A node always counts itself.
    pub fn is_empty(&self) -> bool {
        false
    }
}
