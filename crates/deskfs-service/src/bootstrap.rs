//! First-boot discovery of the system folder and metadata documents.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use deskfs_core::config::bootstrap::BootstrapConfig;
use deskfs_core::result::AppResult;
use deskfs_core::traits::remote::RemoteDirectory;
use deskfs_entity::bootstrap::BootstrapState;
use deskfs_entity::id::{DocumentId, ItemId};

/// Content of a freshly created metadata document.
const EMPTY_DOCUMENT: &[u8] = b"{}";

/// MIME type of the metadata documents.
const DOCUMENT_MIME_TYPE: &str = "application/json";

/// Resolves [`BootstrapState`], creating whatever is missing.
#[derive(Debug, Clone)]
pub struct BootstrapService {
    remote: Arc<dyn RemoteDirectory>,
    names: BootstrapConfig,
}

impl BootstrapService {
    /// Create a bootstrap service.
    pub fn new(remote: Arc<dyn RemoteDirectory>, names: BootstrapConfig) -> Self {
        Self { remote, names }
    }

    /// Probe the backend and create the system folder and the two empty
    /// documents if absent.
    pub async fn resolve(&self) -> AppResult<BootstrapState> {
        let probe = self.remote.locate_system_bootstrap(&self.names).await?;
        if probe.is_complete() {
            info!("System bootstrap found");
        }

        let system_folder_id = match probe.system_folder_id {
            Some(id) => id,
            None => {
                let created = self
                    .remote
                    .create_folder(&ItemId::root(), &self.names.system_folder_name)
                    .await?;
                info!(folder_id = %created.id, "Created system folder");
                created.id
            }
        };

        let db_document_id = match probe.db_document_id {
            Some(id) => id,
            None => {
                self.create_document(&system_folder_id, &self.names.tree_document_name)
                    .await?
            }
        };

        let comment_document_id = match probe.comment_document_id {
            Some(id) => id,
            None => {
                self.create_document(&system_folder_id, &self.names.comment_document_name)
                    .await?
            }
        };

        Ok(BootstrapState {
            system_folder_id,
            db_document_id,
            comment_document_id,
        })
    }

    async fn create_document(&self, folder_id: &ItemId, name: &str) -> AppResult<DocumentId> {
        let file = self
            .remote
            .upload_file(
                Bytes::from_static(EMPTY_DOCUMENT),
                name,
                DOCUMENT_MIME_TYPE,
                folder_id,
            )
            .await?;
        info!(document_id = %file.id, name, "Created metadata document");
        Ok(DocumentId::from(file.id.as_str()))
    }
}
