//! Names of the well-known system objects located at boot.

use serde::{Deserialize, Serialize};

/// Well-known names probed on the remote backend at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Name of the protected folder holding the metadata documents.
    #[serde(default = "default_system_folder")]
    pub system_folder_name: String,
    /// File name of the tree-index document.
    #[serde(default = "default_tree_document")]
    pub tree_document_name: String,
    /// File name of the comment document.
    #[serde(default = "default_comment_document")]
    pub comment_document_name: String,
    /// Exact name of the recycle bin folder in root.
    #[serde(default = "default_recycle_bin")]
    pub recycle_bin_name: String,
    /// Password for the system folder gate. `None` leaves it unlocked.
    #[serde(default)]
    pub system_password: Option<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            system_folder_name: default_system_folder(),
            tree_document_name: default_tree_document(),
            comment_document_name: default_comment_document(),
            recycle_bin_name: default_recycle_bin(),
            system_password: None,
        }
    }
}

fn default_system_folder() -> String {
    "System".to_string()
}

fn default_tree_document() -> String {
    "folder_map.json".to_string()
}

fn default_comment_document() -> String {
    "comments.json".to_string()
}

fn default_recycle_bin() -> String {
    "Recycle Bin".to_string()
}
