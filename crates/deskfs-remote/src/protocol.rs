//! Wire protocol of the single JSON-over-HTTP endpoint.
//!
//! Every call is a `POST` of one JSON object tagged by `action`. Every
//! response carries a `status` field; anything other than `"success"` is a
//! failure whose `message` is surfaced verbatim.

use serde::Serialize;
use serde_json::Value;

use deskfs_core::error::AppError;
use deskfs_core::result::AppResult;
use deskfs_entity::id::{DocumentId, ItemId};

/// Status string of a successful response.
pub const STATUS_SUCCESS: &str = "success";

/// One request to the remote endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RemoteRequest<'a> {
    /// List the children of a folder.
    ListFolder { folder_id: &'a ItemId },
    /// Create a folder.
    CreateFolder { parent_id: &'a ItemId, name: &'a str },
    /// Re-parent items.
    MoveItems {
        ids: &'a [ItemId],
        target_folder_id: &'a ItemId,
    },
    /// Rename one item.
    RenameItem { id: &'a ItemId, new_name: &'a str },
    /// Copy items.
    DuplicateItems { ids: &'a [ItemId] },
    /// Permanently delete items.
    DeleteItems { ids: &'a [ItemId] },
    /// Upload a base64-encoded file.
    UploadFile {
        name: &'a str,
        mime_type: &'a str,
        folder_id: &'a ItemId,
        data: String,
    },
    /// Read a JSON document.
    ReadDocument { document_id: &'a DocumentId },
    /// Overwrite a JSON document.
    WriteDocument {
        document_id: &'a DocumentId,
        content: &'a str,
    },
    /// Probe for the system folder and documents.
    LocateSystemBootstrap {
        system_folder_name: &'a str,
        tree_document_name: &'a str,
        comment_document_name: &'a str,
    },
}

impl RemoteRequest<'_> {
    /// Action name, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            Self::ListFolder { .. } => "listFolder",
            Self::CreateFolder { .. } => "createFolder",
            Self::MoveItems { .. } => "moveItems",
            Self::RenameItem { .. } => "renameItem",
            Self::DuplicateItems { .. } => "duplicateItems",
            Self::DeleteItems { .. } => "deleteItems",
            Self::UploadFile { .. } => "uploadFile",
            Self::ReadDocument { .. } => "readDocument",
            Self::WriteDocument { .. } => "writeDocument",
            Self::LocateSystemBootstrap { .. } => "locateSystemBootstrap",
        }
    }
}

/// Check the `status` field of a response body and return the body.
pub fn check_status(action: &str, body: Value) -> AppResult<Value> {
    let status = body.get("status").and_then(Value::as_str).unwrap_or("");
    if status == STATUS_SUCCESS {
        return Ok(body);
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{action} failed with status '{status}'"));
    Err(AppError::network(message))
}

/// Take the `data` field out of a checked response body.
pub fn take_data(action: &str, mut body: Value) -> AppResult<Value> {
    match body.get_mut("data") {
        Some(data) => Ok(data.take()),
        None => Err(AppError::network(format!(
            "{action} response is missing 'data'"
        ))),
    }
}
