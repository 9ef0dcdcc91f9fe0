//! In-process remote directory.
//!
//! Behaves like the real backend: a flat set of objects, each knowing only
//! its parent. Supports artificial latency and per-operation failure
//! injection, and counts document writes so sync behaviour can be asserted.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use deskfs_core::config::bootstrap::BootstrapConfig;
use deskfs_core::error::AppError;
use deskfs_core::result::AppResult;
use deskfs_core::traits::remote::RemoteDirectory;
use deskfs_entity::bootstrap::BootstrapProbe;
use deskfs_entity::id::{DocumentId, ItemId};
use deskfs_entity::item::{Item, ItemKind};
use deskfs_entity::remote::{CreatedFolder, DriveFileDescriptor, FolderListing};

use crate::protocol::STATUS_SUCCESS;

/// Remote operations, used to target failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    /// `list_folder`
    ListFolder,
    /// `create_folder`
    CreateFolder,
    /// `move_items`
    MoveItems,
    /// `rename_item`
    RenameItem,
    /// `duplicate_items`
    DuplicateItems,
    /// `delete_items`
    DeleteItems,
    /// `upload_file`
    UploadFile,
    /// `read_document`
    ReadDocument,
    /// `write_document`
    WriteDocument,
    /// `locate_system_bootstrap`
    LocateBootstrap,
}

impl fmt::Display for RemoteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListFolder => "listFolder",
            Self::CreateFolder => "createFolder",
            Self::MoveItems => "moveItems",
            Self::RenameItem => "renameItem",
            Self::DuplicateItems => "duplicateItems",
            Self::DeleteItems => "deleteItems",
            Self::UploadFile => "uploadFile",
            Self::ReadDocument => "readDocument",
            Self::WriteDocument => "writeDocument",
            Self::LocateBootstrap => "locateSystemBootstrap",
        };
        write!(f, "{name}")
    }
}

/// One stored object.
#[derive(Debug, Clone)]
struct StoredObject {
    item: Item,
    parent_id: ItemId,
    payload: Option<Bytes>,
}

#[derive(Debug, Default)]
struct State {
    objects: BTreeMap<ItemId, StoredObject>,
    next_id: u64,
    document_writes: HashMap<DocumentId, usize>,
}

impl State {
    fn allocate_id(&mut self, prefix: &str) -> ItemId {
        self.next_id += 1;
        ItemId::from(format!("{prefix}-{}", self.next_id))
    }

    fn require_folder(&self, id: &ItemId) -> AppResult<()> {
        if id.is_root() {
            return Ok(());
        }
        match self.objects.get(id) {
            Some(obj) if obj.item.is_folder() => Ok(()),
            Some(_) => Err(AppError::network(format!("{id} is not a folder"))),
            None => Err(AppError::network(format!("Folder {id} not found"))),
        }
    }

    fn children(&self, parent: &ItemId) -> Vec<ItemId> {
        self.objects
            .iter()
            .filter(|(_, obj)| &obj.parent_id == parent)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn subtree(&self, id: &ItemId) -> Vec<ItemId> {
        let mut out = vec![id.clone()];
        let mut i = 0;
        while i < out.len() {
            let next = self.children(&out[i]);
            out.extend(next);
            i += 1;
        }
        out
    }

    fn copy_object(&mut self, id: &ItemId, parent: ItemId, rename: bool) -> Option<ItemId> {
        let original = self.objects.get(id)?.clone();
        let prefix = if original.item.is_folder() { "folder" } else { "file" };
        let new_id = self.allocate_id(prefix);

        let mut item = original.item.clone();
        item.id = new_id.clone();
        if rename {
            item.name = format!("Copy of {}", original.item.name);
        }
        item.last_updated = Some(Utc::now());
        self.objects.insert(
            new_id.clone(),
            StoredObject {
                item,
                parent_id: parent,
                payload: original.payload.clone(),
            },
        );

        for child in self.children(id) {
            self.copy_object(&child, new_id.clone(), false);
        }
        Some(new_id)
    }

    fn find_child(&self, parent: &ItemId, name: &str, folder: bool) -> Option<ItemId> {
        self.objects
            .iter()
            .find(|(_, obj)| {
                &obj.parent_id == parent && obj.item.name == name && obj.item.is_folder() == folder
            })
            .map(|(id, _)| id.clone())
    }
}

/// In-process flat object store implementing [`RemoteDirectory`].
#[derive(Debug, Clone, Default)]
pub struct MemoryRemoteDirectory {
    state: Arc<RwLock<State>>,
    failing: Arc<RwLock<HashSet<RemoteOp>>>,
    latency: Arc<RwLock<Duration>>,
}

impl MemoryRemoteDirectory {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = latency;
    }

    /// Make every call of `op` fail until cleared.
    pub async fn fail(&self, op: RemoteOp) {
        self.failing.write().await.insert(op);
    }

    /// Clear an injected failure.
    pub async fn recover(&self, op: RemoteOp) {
        self.failing.write().await.remove(&op);
    }

    /// Insert an item directly under `parent_id`.
    pub async fn insert(&self, parent_id: &ItemId, item: Item) {
        let mut state = self.state.write().await;
        state.objects.insert(
            item.id.clone(),
            StoredObject {
                item,
                parent_id: parent_id.clone(),
                payload: None,
            },
        );
    }

    /// Insert a folder with a generated id and return the id.
    pub async fn insert_folder(&self, parent_id: &ItemId, name: &str) -> ItemId {
        let mut state = self.state.write().await;
        let id = state.allocate_id("folder");
        state.objects.insert(
            id.clone(),
            StoredObject {
                item: Item::new(id.clone(), ItemKind::Folder, name),
                parent_id: parent_id.clone(),
                payload: None,
            },
        );
        id
    }

    /// Current parent of an object.
    pub async fn parent_of(&self, id: &ItemId) -> Option<ItemId> {
        let state = self.state.read().await;
        state.objects.get(id).map(|obj| obj.parent_id.clone())
    }

    /// Current name of an object.
    pub async fn name_of(&self, id: &ItemId) -> Option<String> {
        let state = self.state.read().await;
        state.objects.get(id).map(|obj| obj.item.name.clone())
    }

    /// Whether an object exists.
    pub async fn contains(&self, id: &ItemId) -> bool {
        self.state.read().await.objects.contains_key(id)
    }

    /// Raw content of a document.
    pub async fn document_content(&self, id: &DocumentId) -> Option<String> {
        let state = self.state.read().await;
        let obj = state.objects.get(&ItemId::from(id.as_str()))?;
        let payload = obj.payload.as_ref()?;
        Some(String::from_utf8_lossy(payload).into_owned())
    }

    /// Number of `write_document` calls that reached a document.
    pub async fn document_writes(&self, id: &DocumentId) -> usize {
        let state = self.state.read().await;
        state.document_writes.get(id).copied().unwrap_or(0)
    }

    /// Total number of stored objects.
    pub async fn object_count(&self) -> usize {
        self.state.read().await.objects.len()
    }

    /// Apply latency and injected failure for `op`.
    async fn enter(&self, op: RemoteOp) -> AppResult<()> {
        let latency = *self.latency.read().await;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.failing.read().await.contains(&op) {
            debug!(op = %op, "Injected remote failure");
            return Err(AppError::network(format!("{op} failed: backend unavailable")));
        }
        Ok(())
    }
}

fn kind_for_mime(mime_type: &str) -> ItemKind {
    if mime_type.starts_with("image/") {
        ItemKind::Image
    } else {
        ItemKind::Note
    }
}

#[async_trait]
impl RemoteDirectory for MemoryRemoteDirectory {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn list_folder(&self, folder_id: &ItemId) -> AppResult<FolderListing> {
        self.enter(RemoteOp::ListFolder).await?;
        let state = self.state.read().await;
        state.require_folder(folder_id)?;

        let items = state
            .objects
            .values()
            .filter(|obj| &obj.parent_id == folder_id)
            .map(|obj| obj.item.clone())
            .collect();
        let parent_folder_id = state.objects.get(folder_id).map(|obj| obj.parent_id.clone());

        Ok(FolderListing {
            status: STATUS_SUCCESS.to_string(),
            items,
            parent_folder_id,
        })
    }

    async fn create_folder(&self, parent_id: &ItemId, name: &str) -> AppResult<CreatedFolder> {
        self.enter(RemoteOp::CreateFolder).await?;
        let mut state = self.state.write().await;
        state.require_folder(parent_id)?;

        let id = state.allocate_id("folder");
        let mut item = Item::new(id.clone(), ItemKind::Folder, name);
        item.last_updated = Some(Utc::now());
        state.objects.insert(
            id.clone(),
            StoredObject {
                item,
                parent_id: parent_id.clone(),
                payload: None,
            },
        );
        Ok(CreatedFolder {
            id,
            name: name.to_string(),
        })
    }

    async fn move_items(&self, ids: &[ItemId], target_folder_id: &ItemId) -> AppResult<()> {
        self.enter(RemoteOp::MoveItems).await?;
        let mut state = self.state.write().await;
        state.require_folder(target_folder_id)?;
        if let Some(missing) = ids.iter().find(|id| !state.objects.contains_key(*id)) {
            return Err(AppError::network(format!("Item {missing} not found")));
        }
        for id in ids {
            if let Some(obj) = state.objects.get_mut(id) {
                obj.parent_id = target_folder_id.clone();
            }
        }
        Ok(())
    }

    async fn rename_item(&self, id: &ItemId, new_name: &str) -> AppResult<()> {
        self.enter(RemoteOp::RenameItem).await?;
        let mut state = self.state.write().await;
        let obj = state
            .objects
            .get_mut(id)
            .ok_or_else(|| AppError::network(format!("Item {id} not found")))?;
        obj.item.name = new_name.to_string();
        obj.item.last_updated = Some(Utc::now());
        Ok(())
    }

    async fn duplicate_items(&self, ids: &[ItemId]) -> AppResult<()> {
        self.enter(RemoteOp::DuplicateItems).await?;
        let mut state = self.state.write().await;
        for id in ids {
            let parent = state
                .objects
                .get(id)
                .map(|obj| obj.parent_id.clone())
                .ok_or_else(|| AppError::network(format!("Item {id} not found")))?;
            state.copy_object(id, parent, true);
        }
        Ok(())
    }

    async fn delete_items(&self, ids: &[ItemId]) -> AppResult<()> {
        self.enter(RemoteOp::DeleteItems).await?;
        let mut state = self.state.write().await;
        for id in ids {
            for doomed in state.subtree(id) {
                state.objects.remove(&doomed);
            }
        }
        Ok(())
    }

    async fn upload_file(
        &self,
        bytes: Bytes,
        name: &str,
        mime_type: &str,
        folder_id: &ItemId,
    ) -> AppResult<DriveFileDescriptor> {
        self.enter(RemoteOp::UploadFile).await?;
        let mut state = self.state.write().await;
        state.require_folder(folder_id)?;

        let id = state.allocate_id("file");
        let mut item = Item::new(id.clone(), kind_for_mime(mime_type), name);
        item.last_updated = Some(Utc::now());
        item.url = Some(format!("memory://{id}"));
        state.objects.insert(
            id.clone(),
            StoredObject {
                item,
                parent_id: folder_id.clone(),
                payload: Some(bytes),
            },
        );

        Ok(DriveFileDescriptor {
            id: id.clone(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            url: Some(format!("memory://{id}")),
        })
    }

    async fn read_document(&self, document_id: &DocumentId) -> AppResult<String> {
        self.enter(RemoteOp::ReadDocument).await?;
        self.document_content(document_id)
            .await
            .ok_or_else(|| AppError::network(format!("Document {document_id} not found")))
    }

    async fn write_document(&self, document_id: &DocumentId, content: &str) -> AppResult<()> {
        self.enter(RemoteOp::WriteDocument).await?;
        let mut state = self.state.write().await;
        let key = ItemId::from(document_id.as_str());
        let obj = state
            .objects
            .get_mut(&key)
            .ok_or_else(|| AppError::network(format!("Document {document_id} not found")))?;
        obj.payload = Some(Bytes::copy_from_slice(content.as_bytes()));
        obj.item.last_updated = Some(Utc::now());
        *state
            .document_writes
            .entry(document_id.clone())
            .or_insert(0) += 1;
        Ok(())
    }

    async fn locate_system_bootstrap(&self, names: &BootstrapConfig) -> AppResult<BootstrapProbe> {
        self.enter(RemoteOp::LocateBootstrap).await?;
        let state = self.state.read().await;

        let Some(system) = state.find_child(&ItemId::root(), &names.system_folder_name, true)
        else {
            return Ok(BootstrapProbe::default());
        };
        let document = |name: &str| {
            state
                .find_child(&system, name, false)
                .map(|id| DocumentId::from(id.as_str()))
        };

        Ok(BootstrapProbe {
            db_document_id: document(&names.tree_document_name),
            comment_document_id: document(&names.comment_document_name),
            system_folder_id: Some(system),
        })
    }
}
