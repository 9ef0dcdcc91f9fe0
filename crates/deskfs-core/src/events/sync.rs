//! Background sync channel events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two independently synced remote documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// The folder-id to `{name, parentId}` map.
    TreeIndex,
    /// The item-id to comment list map.
    Comments,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TreeIndex => write!(f, "tree_index"),
            Self::Comments => write!(f, "comments"),
        }
    }
}

/// Observable state of a flush channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// Nothing pending.
    Idle,
    /// A timer is running; a flush will follow.
    Armed,
    /// A remote write is in flight.
    Flushing,
}

/// Events published by the sync scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SyncEvent {
    /// A channel moved to a new phase.
    PhaseChanged {
        /// Which document.
        document: DocumentKind,
        /// The new phase.
        phase: SyncPhase,
    },
    /// A flush failed. No retry is scheduled.
    FlushFailed {
        /// Which document.
        document: DocumentKind,
        /// The error message.
        message: String,
    },
}
