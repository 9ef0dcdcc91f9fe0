//! Durable file-backed cache store.

pub mod store;

pub use store::FileCacheStore;
