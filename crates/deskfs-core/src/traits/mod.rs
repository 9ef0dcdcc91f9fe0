//! Collaborator traits defined in `deskfs-core` and implemented by other crates.

pub mod cache;
pub mod remote;

pub use cache::LocalCacheStore;
pub use remote::RemoteDirectory;
