//! # deskfs-cache
//!
//! Local cache store implementations for deskfs. Supports two modes:
//!
//! - **memory**: In-process store using [moka](https://crates.io/crates/moka)
//!   for folder listings and [dashmap](https://crates.io/crates/dashmap) for
//!   the singleton snapshots. Lost on restart.
//! - **file**: Durable JSON files under a directory, so a restarted session
//!   can seed its tree and listings without a network round trip.
//!
//! The provider is selected at runtime based on configuration.

pub mod entry;
#[cfg(feature = "file")]
pub mod file;
pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;

pub use entry::CachedListing;
pub use provider::CacheManager;
