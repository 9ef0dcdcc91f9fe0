//! Folder listings: ordering and the cache-then-remote loader.

pub mod collation;
pub mod loader;

pub use collation::natural_cmp;
pub use loader::{ListingLoader, ListingOutcome};
