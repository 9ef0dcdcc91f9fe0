//! Documents that can be flushed by a sync channel.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use deskfs_core::error::AppError;
use deskfs_core::events::DocumentKind;
use deskfs_core::result::AppResult;
use deskfs_core::traits::cache::LocalCacheStore;

/// An in-memory document persisted whole to one remote JSON document.
#[async_trait]
pub trait SyncSource: Send + Sync + 'static {
    /// The serialisable copy taken at flush time.
    type Snapshot: Serialize + Send + Sync;

    /// Which document this is.
    fn kind(&self) -> DocumentKind;

    /// Copy the entire current document.
    async fn snapshot(&self) -> Self::Snapshot;

    /// Store a successfully flushed snapshot in the local cache.
    async fn write_through(
        &self,
        cache: &dyn LocalCacheStore,
        snapshot: &Self::Snapshot,
    ) -> AppResult<()>;
}

/// Parse a remote JSON document.
///
/// Blank content is the empty document. Anything unparsable is
/// `DataCorruption`; there is no schema versioning to recover with.
pub fn decode_document<T>(kind: DocumentKind, raw: &str) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(raw).map_err(|e| {
        AppError::data_corruption(format!("Remote {kind} document is not valid JSON: {e}"))
    })
}
