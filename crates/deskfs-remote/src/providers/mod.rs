//! Remote directory implementations.

#[cfg(feature = "http")]
pub mod http;
pub mod memory;

#[cfg(feature = "http")]
pub use http::HttpRemoteDirectory;
pub use memory::{MemoryRemoteDirectory, RemoteOp};
