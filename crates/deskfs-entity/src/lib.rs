//! # deskfs-entity
//!
//! Data model for deskfs. Every struct in this crate is either a value the
//! engine keeps in memory (items, folder map entries, comments), a
//! persisted document shape, or a remote wire type. All derive `Debug`,
//! `Clone`, `Serialize`, and `Deserialize`; JSON field names follow the
//! camelCase wire format of the remote documents.

pub mod bootstrap;
pub mod comment;
pub mod folder;
pub mod id;
pub mod item;
pub mod remote;

pub use id::{CommentId, DocumentId, ItemId, ROOT_KEY};
