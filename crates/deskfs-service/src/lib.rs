//! # deskfs-service
//!
//! Session engine for deskfs. Owns the folder tree index and the comment
//! store, keeps both synchronised with their remote documents, loads folder
//! listings through the local cache, and runs bulk operations with
//! optimistic updates.
//!
//! Components take their dependencies at construction time as `Arc`
//! references; [`SessionContext`] wires them together.

pub mod bootstrap;
pub mod comments;
pub mod context;
pub mod drag;
pub mod explorer;
pub mod gate;
pub mod listing;
pub mod ops;
pub mod sync;
pub mod tree;

#[cfg(test)]
pub(crate) mod testing;

pub use bootstrap::BootstrapService;
pub use comments::{CommentRefresher, CommentStore};
pub use context::SessionContext;
pub use drag::{DragEffect, DragEvent, DragMachine, DragState, HitTester, Point, PointerKind, Rect};
pub use explorer::{ExplorerState, ExplorerView, NavigationToken, ViewSnapshot};
pub use gate::SystemGate;
pub use listing::{ListingLoader, ListingOutcome, natural_cmp};
pub use ops::{BulkCoordinator, Command, MoveCommand, UploadCommand, run_optimistic};
pub use sync::{SyncChannel, SyncSource, SyncTrigger, SyncWorker, decode_document};
pub use tree::TreeIndex;
