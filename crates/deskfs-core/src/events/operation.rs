//! Transient status of user-triggered operations.

use serde::{Deserialize, Serialize};

/// Lifecycle of a user-triggered mutation: loading, then success or error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OperationEvent {
    /// The operation was issued.
    Started {
        /// Human-readable description ("Moving 3 items").
        label: String,
    },
    /// The remote call succeeded and local state was reconciled.
    Succeeded {
        /// Human-readable description.
        label: String,
    },
    /// The remote call failed; local state was rolled back or left untouched.
    Failed {
        /// Human-readable description.
        label: String,
        /// The error message.
        message: String,
    },
}

impl OperationEvent {
    /// Shorthand for [`OperationEvent::Started`].
    pub fn started(label: impl Into<String>) -> Self {
        Self::Started {
            label: label.into(),
        }
    }

    /// Shorthand for [`OperationEvent::Succeeded`].
    pub fn succeeded(label: impl Into<String>) -> Self {
        Self::Succeeded {
            label: label.into(),
        }
    }

    /// Shorthand for [`OperationEvent::Failed`].
    pub fn failed(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            label: label.into(),
            message: message.into(),
        }
    }
}
