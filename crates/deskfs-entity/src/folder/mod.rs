//! Folder map entries and the persisted tree-index document.

pub mod model;
pub mod tree;

pub use model::{FolderEntry, FolderEntryUpdate};
pub use tree::{FolderMap, FolderNode, TreeSnapshot};
