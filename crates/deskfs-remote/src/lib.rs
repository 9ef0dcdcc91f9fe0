//! # deskfs-remote
//!
//! Remote directory clients for deskfs. The backend is a flat object store
//! reached through a single JSON-over-HTTP endpoint; an in-process
//! implementation with the same semantics backs tests and offline use.

pub mod connect;
pub mod protocol;
pub mod providers;

pub use connect::connect;
#[cfg(feature = "http")]
pub use providers::HttpRemoteDirectory;
pub use providers::{MemoryRemoteDirectory, RemoteOp};
