//! Client-side folder hierarchy.

pub mod index;

pub use index::TreeIndex;
