//! The tree index: the client's reconstruction of folder hierarchy.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use deskfs_core::error::AppError;
use deskfs_core::events::DocumentKind;
use deskfs_core::result::AppResult;
use deskfs_core::traits::cache::LocalCacheStore;
use deskfs_entity::folder::{FolderEntry, FolderEntryUpdate, FolderMap, FolderNode, TreeSnapshot};
use deskfs_entity::id::{DocumentId, ItemId};

use crate::listing::collation::natural_cmp;
use crate::sync::{SyncSource, SyncTrigger};

/// Display name of the synthetic root in rendered trees.
pub const ROOT_NAME: &str = "/";

/// Folder id to `{name, parentId}`, shared by the listing loader and the
/// bulk coordinator.
///
/// Entries are only ever removed by [`TreeIndex::remove`]; folders that
/// become unreachable from root stay in the map. Every change arms the
/// tree sync channel while the map lock is held; nothing here writes
/// remotely.
#[derive(Debug)]
pub struct TreeIndex {
    map: RwLock<FolderMap>,
    document_id: DocumentId,
    sync: SyncTrigger,
}

impl TreeIndex {
    /// Create an index over an initial map.
    pub fn new(document_id: DocumentId, map: FolderMap, sync: SyncTrigger) -> Self {
        Self {
            map: RwLock::new(map),
            document_id,
            sync,
        }
    }

    /// The remote document this index is flushed to.
    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    /// The sync channel handle.
    pub fn sync(&self) -> &SyncTrigger {
        &self.sync
    }

    /// Look up a folder.
    pub async fn get(&self, folder_id: &ItemId) -> Option<FolderEntry> {
        self.map.read().await.get(folder_id).cloned()
    }

    /// Number of known folders.
    pub async fn len(&self) -> usize {
        self.map.read().await.len()
    }

    /// Whether no folder is known yet.
    pub async fn is_empty(&self) -> bool {
        self.map.read().await.is_empty()
    }

    /// Merge entries into the map and return how many changed.
    ///
    /// An existing entry keeps its parent unless the update supplies one.
    pub async fn upsert_many<I>(&self, updates: I) -> usize
    where
        I: IntoIterator<Item = FolderEntryUpdate>,
    {
        let mut map = self.map.write().await;
        let mut changed = 0;

        for update in updates {
            if update.id.is_root() {
                continue;
            }
            match map.get_mut(&update.id) {
                Some(entry) => {
                    let parent = update.parent_id.unwrap_or_else(|| entry.parent_id.clone());
                    if entry.name != update.name || entry.parent_id != parent {
                        entry.name = update.name;
                        entry.parent_id = parent;
                        changed += 1;
                    }
                }
                None => {
                    let parent = update.parent_id.unwrap_or_else(ItemId::root);
                    map.insert(
                        update.id.clone(),
                        FolderEntry::new(update.id, update.name, parent),
                    );
                    changed += 1;
                }
            }
        }

        if changed > 0 {
            debug!(changed, "Tree index updated");
            self.sync.mark_dirty();
        }
        changed
    }

    /// Overwrite the parent of a known folder. Returns `false` when the
    /// folder is not in the index.
    pub async fn reparent(&self, folder_id: &ItemId, new_parent_id: &ItemId) -> bool {
        let mut map = self.map.write().await;
        let Some(entry) = map.get_mut(folder_id) else {
            return false;
        };
        entry.parent_id = new_parent_id.clone();
        self.sync.mark_dirty();
        true
    }

    /// Drop a folder after permanent deletion.
    pub async fn remove(&self, folder_id: &ItemId) -> Option<FolderEntry> {
        let mut map = self.map.write().await;
        let removed = map.remove(folder_id);
        if removed.is_some() {
            self.sync.mark_dirty();
        }
        removed
    }

    /// Drop a folder and every known descendant. Returns the removed ids.
    pub async fn remove_subtree(&self, folder_id: &ItemId) -> Vec<ItemId> {
        let mut map = self.map.write().await;
        let mut doomed = vec![folder_id.clone()];
        let mut queued: HashSet<ItemId> = HashSet::from([folder_id.clone()]);
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i].clone();
            for entry in map.values().filter(|entry| entry.parent_id == parent) {
                if queued.insert(entry.id.clone()) {
                    doomed.push(entry.id.clone());
                }
            }
            i += 1;
        }

        let removed: Vec<ItemId> = doomed
            .into_iter()
            .filter(|id| map.remove(id).is_some())
            .collect();

        if !removed.is_empty() {
            self.sync.mark_dirty();
        }
        removed
    }

    /// Copy of the whole map.
    pub async fn snapshot(&self) -> FolderMap {
        self.map.read().await.clone()
    }

    /// Replace the whole map with one read from the remote document.
    ///
    /// `read_at` is [`SyncTrigger::revision`] taken before the read started.
    /// When any mutation landed since then, or local changes are still
    /// unflushed, the map is left alone and `false` is returned. Otherwise
    /// the result is considered in sync and no flush is scheduled.
    pub async fn replace_from_remote(&self, map: FolderMap, read_at: u64) -> bool {
        let mut current = self.map.write().await;
        if self.sync.revision() != read_at || self.sync.is_dirty() {
            return false;
        }
        *current = map;
        self.sync.mark_clean();
        true
    }

    /// Ancestor chain of a folder, root-first, ending with the folder
    /// itself. Stops at root, at an unknown ancestor, or at the first
    /// repeated id.
    pub async fn path_to(&self, folder_id: &ItemId) -> Vec<FolderEntry> {
        let map = self.map.read().await;
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = folder_id.clone();

        while !cursor.is_root() && seen.insert(cursor.clone()) {
            let Some(entry) = map.get(&cursor) else {
                break;
            };
            cursor = entry.parent_id.clone();
            chain.push(entry.clone());
        }

        chain.reverse();
        chain
    }

    /// Known direct child folders, in natural name order.
    pub async fn children_of(&self, parent_id: &ItemId) -> Vec<FolderEntry> {
        let map = self.map.read().await;
        let mut children: Vec<FolderEntry> = map
            .values()
            .filter(|entry| &entry.parent_id == parent_id)
            .cloned()
            .collect();
        children.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        children
    }

    /// Whether `candidate` lies strictly below `ancestor` in the index.
    pub async fn is_descendant(&self, candidate: &ItemId, ancestor: &ItemId) -> bool {
        if candidate == ancestor {
            return false;
        }
        if ancestor.is_root() {
            return !candidate.is_root();
        }
        self.path_to(candidate)
            .await
            .iter()
            .rev()
            .skip(1)
            .any(|entry| &entry.id == ancestor)
    }

    /// Render the known subtree under `folder_id`.
    ///
    /// `max_depth` limits how many levels below the start are expanded.
    pub async fn build_tree(
        &self,
        folder_id: &ItemId,
        max_depth: Option<usize>,
    ) -> AppResult<FolderNode> {
        let map = self.map.read().await;
        let name = if folder_id.is_root() {
            ROOT_NAME.to_string()
        } else {
            map.get(folder_id)
                .map(|entry| entry.name.clone())
                .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not in tree index")))?
        };

        let mut visited = BTreeSet::new();
        visited.insert(folder_id.clone());
        Ok(build_node(
            &map,
            folder_id.clone(),
            name,
            0,
            max_depth,
            &mut visited,
        ))
    }
}

fn build_node(
    map: &FolderMap,
    id: ItemId,
    name: String,
    depth: usize,
    max_depth: Option<usize>,
    visited: &mut BTreeSet<ItemId>,
) -> FolderNode {
    let mut children = Vec::new();
    if max_depth.is_none_or(|max| depth < max) {
        let mut entries: Vec<&FolderEntry> =
            map.values().filter(|entry| entry.parent_id == id).collect();
        entries.sort_by(|a, b| natural_cmp(&a.name, &b.name));

        for entry in entries {
            if !visited.insert(entry.id.clone()) {
                continue;
            }
            children.push(build_node(
                map,
                entry.id.clone(),
                entry.name.clone(),
                depth + 1,
                max_depth,
                visited,
            ));
        }
    }

    FolderNode {
        id,
        name,
        depth,
        children,
    }
}

#[async_trait]
impl SyncSource for TreeIndex {
    type Snapshot = FolderMap;

    fn kind(&self) -> DocumentKind {
        DocumentKind::TreeIndex
    }

    async fn snapshot(&self) -> FolderMap {
        TreeIndex::snapshot(self).await
    }

    async fn write_through(&self, cache: &dyn LocalCacheStore, map: &FolderMap) -> AppResult<()> {
        cache
            .put_tree_snapshot(&TreeSnapshot {
                document_id: self.document_id.clone(),
                map: map.clone(),
                last_sync_timestamp: Utc::now(),
            })
            .await
    }
}
