//! Comment threads and their background refresh.

pub mod refresh;
pub mod store;

pub use refresh::CommentRefresher;
pub use store::CommentStore;
