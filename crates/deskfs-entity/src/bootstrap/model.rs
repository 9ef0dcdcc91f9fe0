//! Bootstrap state model.

use serde::{Deserialize, Serialize};

use crate::id::{DocumentId, ItemId};

/// Ids of the system folder and the two metadata documents.
///
/// Resolved once at startup and immutable for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapState {
    /// The protected system folder.
    pub system_folder_id: ItemId,
    /// The tree-index document.
    pub db_document_id: DocumentId,
    /// The comment document.
    pub comment_document_id: DocumentId,
}

/// What a first-boot probe found on the backend. Anything missing is
/// created by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapProbe {
    /// The system folder, if present.
    pub system_folder_id: Option<ItemId>,
    /// The tree-index document, if present.
    pub db_document_id: Option<DocumentId>,
    /// The comment document, if present.
    pub comment_document_id: Option<DocumentId>,
}

impl BootstrapProbe {
    /// Whether every well-known object already exists.
    pub fn is_complete(&self) -> bool {
        self.system_folder_id.is_some()
            && self.db_document_id.is_some()
            && self.comment_document_id.is_some()
    }
}
