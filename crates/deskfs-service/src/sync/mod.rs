//! Background persistence of the tree index and comment documents.

pub mod channel;
pub mod source;

pub use channel::{SyncChannel, SyncTrigger, SyncWorker};
pub use source::{SyncSource, decode_document};
