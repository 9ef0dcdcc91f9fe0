//! JSON-over-HTTP remote directory client.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use deskfs_core::config::bootstrap::BootstrapConfig;
use deskfs_core::config::remote::RemoteConfig;
use deskfs_core::error::{AppError, ErrorKind};
use deskfs_core::result::AppResult;
use deskfs_core::traits::remote::RemoteDirectory;
use deskfs_entity::bootstrap::BootstrapProbe;
use deskfs_entity::id::{DocumentId, ItemId};
use deskfs_entity::remote::{CreatedFolder, DriveFileDescriptor, FolderListing};

use crate::protocol::{self, RemoteRequest};

/// Remote directory reached through a single HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpRemoteDirectory {
    /// HTTP client with the configured transport timeout.
    client: reqwest::Client,
    /// Endpoint URL.
    endpoint: String,
    /// Optional key sent as `x-api-key`.
    api_key: Option<String>,
}

impl HttpRemoteDirectory {
    /// Create a new client from configuration.
    pub fn new(config: &RemoteConfig) -> AppResult<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(AppError::configuration(
                "remote.endpoint is required for the http provider",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Send one request and return the status-checked response body.
    async fn call(&self, request: &RemoteRequest<'_>) -> AppResult<Value> {
        let action = request.action();
        debug!(action, endpoint = %self.endpoint, "Remote call");

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }

        let response = builder.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::Network, format!("{action} request failed: {e}"), e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::network(format!("{action} returned HTTP {status}")));
        }

        let body: Value = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Network,
                format!("{action} returned an unreadable body: {e}"),
                e,
            )
        })?;

        protocol::check_status(action, body)
    }

    /// Send a request and decode its `data` field.
    async fn call_data<T: DeserializeOwned>(&self, request: &RemoteRequest<'_>) -> AppResult<T> {
        let body = self.call(request).await?;
        let data = protocol::take_data(request.action(), body)?;
        Ok(serde_json::from_value(data)?)
    }
}

#[async_trait]
impl RemoteDirectory for HttpRemoteDirectory {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn list_folder(&self, folder_id: &ItemId) -> AppResult<FolderListing> {
        let body = self.call(&RemoteRequest::ListFolder { folder_id }).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn create_folder(&self, parent_id: &ItemId, name: &str) -> AppResult<CreatedFolder> {
        self.call_data(&RemoteRequest::CreateFolder { parent_id, name })
            .await
    }

    async fn move_items(&self, ids: &[ItemId], target_folder_id: &ItemId) -> AppResult<()> {
        self.call(&RemoteRequest::MoveItems {
            ids,
            target_folder_id,
        })
        .await?;
        Ok(())
    }

    async fn rename_item(&self, id: &ItemId, new_name: &str) -> AppResult<()> {
        self.call(&RemoteRequest::RenameItem { id, new_name }).await?;
        Ok(())
    }

    async fn duplicate_items(&self, ids: &[ItemId]) -> AppResult<()> {
        self.call(&RemoteRequest::DuplicateItems { ids }).await?;
        Ok(())
    }

    async fn delete_items(&self, ids: &[ItemId]) -> AppResult<()> {
        self.call(&RemoteRequest::DeleteItems { ids }).await?;
        Ok(())
    }

    async fn upload_file(
        &self,
        bytes: Bytes,
        name: &str,
        mime_type: &str,
        folder_id: &ItemId,
    ) -> AppResult<DriveFileDescriptor> {
        self.call_data(&RemoteRequest::UploadFile {
            name,
            mime_type,
            folder_id,
            data: STANDARD.encode(&bytes),
        })
        .await
    }

    async fn read_document(&self, document_id: &DocumentId) -> AppResult<String> {
        self.call_data(&RemoteRequest::ReadDocument { document_id })
            .await
    }

    async fn write_document(&self, document_id: &DocumentId, content: &str) -> AppResult<()> {
        self.call(&RemoteRequest::WriteDocument {
            document_id,
            content,
        })
        .await?;
        Ok(())
    }

    async fn locate_system_bootstrap(&self, names: &BootstrapConfig) -> AppResult<BootstrapProbe> {
        self.call_data(&RemoteRequest::LocateSystemBootstrap {
            system_folder_name: &names.system_folder_name,
            tree_document_name: &names.tree_document_name,
            comment_document_name: &names.comment_document_name,
        })
        .await
    }
}
