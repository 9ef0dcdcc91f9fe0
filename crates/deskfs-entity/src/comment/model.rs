//! Comment entity model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CommentId, DocumentId, ItemId};

/// A comment attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment identifier.
    pub id: CommentId,
    /// The item this comment belongs to.
    pub item_id: ItemId,
    /// Display name of the author.
    pub author: String,
    /// Comment body.
    pub text: String,
    /// When the comment was written.
    pub timestamp: DateTime<Utc>,
}

/// Data required to append a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    /// Display name of the author.
    pub author: String,
    /// Comment body.
    pub text: String,
}

impl NewComment {
    /// Stamp the comment with a fresh id and the current time.
    pub fn into_comment(self, item_id: ItemId) -> Comment {
        Comment {
            id: CommentId::new(),
            item_id,
            author: self.author,
            text: self.text,
            timestamp: Utc::now(),
        }
    }
}

/// Item id to comments in insertion (= chronological) order. Serialises as
/// the remote document `{ "<itemId>": [ {..}, .. ] }`.
pub type CommentDb = BTreeMap<ItemId, Vec<Comment>>;

/// Locally cached copy of the comment document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnapshot {
    /// Remote document the comments were read from or written to.
    pub document_id: DocumentId,
    /// The comment document.
    pub comments: CommentDb,
    /// When the snapshot was last written remotely.
    pub last_sync_timestamp: DateTime<Utc>,
}
