//! Cache key builders for all deskfs cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use deskfs_entity::id::{ItemId, ROOT_KEY};

/// Prefix applied to all deskfs cache keys.
const PREFIX: &str = "deskfs";

/// Key of a folder listing. Root (including the empty id) always maps to
/// the same sentinel key.
pub fn folder_key(folder_id: &ItemId) -> String {
    if folder_id.is_root() {
        format!("{PREFIX}:folder:{ROOT_KEY}")
    } else {
        format!("{PREFIX}:folder:{folder_id}")
    }
}

/// Key of the singleton tree-index snapshot.
pub fn tree_snapshot() -> String {
    format!("{PREFIX}:tree_index")
}

/// Key of the singleton comment snapshot.
pub fn comment_snapshot() -> String {
    format!("{PREFIX}:comments")
}
