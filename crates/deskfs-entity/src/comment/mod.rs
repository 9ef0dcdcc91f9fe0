//! Item comments and the persisted comment document.

pub mod model;

pub use model::{Comment, CommentDb, CommentSnapshot, NewComment};
