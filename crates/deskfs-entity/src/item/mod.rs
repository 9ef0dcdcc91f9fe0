//! Filesystem entries as returned by folder listings.

pub mod model;

pub use model::{Item, ItemKind, ItemStatus};
