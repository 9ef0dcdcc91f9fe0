//! File-backed cache store.
//!
//! Layout under the configured directory:
//!
//! ```text
//! folders/<base64url(key)>.json   one CachedListing per folder
//! tree_index.json                 TreeSnapshot
//! comments.json                   CommentSnapshot
//! ```
//!
//! Each write goes to its own uniquely named temporary file in the target
//! directory, which is then renamed over the destination. A crash mid-write
//! leaves the previous version intact, and concurrent writers of the same
//! key never share a temporary file.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use deskfs_core::error::{AppError, ErrorKind};
use deskfs_core::result::AppResult;
use deskfs_core::traits::cache::LocalCacheStore;
use deskfs_entity::comment::CommentSnapshot;
use deskfs_entity::folder::TreeSnapshot;
use deskfs_entity::item::Item;

use crate::entry::CachedListing;

const FOLDERS_DIR: &str = "folders";
const TREE_FILE: &str = "tree_index.json";
const COMMENTS_FILE: &str = "comments.json";

/// Cache store persisting JSON files on local disk.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    root: PathBuf,
}

impl FileCacheStore {
    /// Open (and create if needed) a store rooted at `directory`.
    pub async fn open(directory: impl AsRef<Path>) -> AppResult<Self> {
        let root = directory.as_ref().to_path_buf();
        tokio::fs::create_dir_all(root.join(FOLDERS_DIR))
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Cache,
                    format!("Failed to create cache dir '{}': {e}", root.display()),
                    e,
                )
            })?;
        Ok(Self { root })
    }

    fn folder_path(&self, key: &str) -> PathBuf {
        let encoded = URL_SAFE_NO_PAD.encode(key.as_bytes());
        self.root.join(FOLDERS_DIR).join(format!("{encoded}.json"))
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> AppResult<Option<T>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    warn!(path = %path.display(), error = %e, "Corrupt cache file");
                    AppError::cache(format!("Corrupt cache file '{}': {e}", path.display()))
                })?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> AppResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let len = bytes.len();
        let target = path.to_path_buf();
        tokio::task::spawn_blocking(move || replace_file(&target, &bytes))
            .await
            .map_err(|e| AppError::cache(format!("Cache write task failed: {e}")))??;
        debug!(path = %path.display(), bytes = len, "Cache file written");
        Ok(())
    }
}

/// Write `bytes` to a fresh temporary file next to `path` and rename it
/// into place.
fn replace_file(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let cache_error = |e: std::io::Error| {
        AppError::with_source(
            ErrorKind::Cache,
            format!("Failed to write cache file '{}': {e}", path.display()),
            e,
        )
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(cache_error)?;
    tmp.write_all(bytes).map_err(cache_error)?;
    tmp.persist(path).map_err(|e| cache_error(e.error))?;
    Ok(())
}

#[async_trait]
impl LocalCacheStore for FileCacheStore {
    fn provider_type(&self) -> &str {
        "file"
    }

    async fn get_cached_folder(&self, key: &str) -> AppResult<Option<Vec<Item>>> {
        let entry: Option<CachedListing> = self.read_json(&self.folder_path(key)).await?;
        Ok(entry.map(|e| e.items))
    }

    async fn put_cached_folder(&self, key: &str, items: &[Item]) -> AppResult<()> {
        self.write_json(&self.folder_path(key), &CachedListing::new(key, items))
            .await
    }

    async fn get_tree_snapshot(&self) -> AppResult<Option<TreeSnapshot>> {
        self.read_json(&self.root.join(TREE_FILE)).await
    }

    async fn put_tree_snapshot(&self, snapshot: &TreeSnapshot) -> AppResult<()> {
        self.write_json(&self.root.join(TREE_FILE), snapshot).await
    }

    async fn get_comment_snapshot(&self) -> AppResult<Option<CommentSnapshot>> {
        self.read_json(&self.root.join(COMMENTS_FILE)).await
    }

    async fn put_comment_snapshot(&self, snapshot: &CommentSnapshot) -> AppResult<()> {
        self.write_json(&self.root.join(COMMENTS_FILE), snapshot).await
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tokio::fs::create_dir_all(self.root.join(FOLDERS_DIR)).await?;
        Ok(())
    }
}
