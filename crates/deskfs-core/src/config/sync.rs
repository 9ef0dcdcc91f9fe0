//! Debounced document sync configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing for the tree-index and comment flush channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Delay between the first tree mutation and the remote write.
    #[serde(default = "default_tree_debounce")]
    pub tree_debounce_ms: u64,
    /// Delay between the first comment append and the remote write.
    #[serde(default = "default_comment_debounce")]
    pub comment_debounce_ms: u64,
    /// Interval of the periodic comment refresh; `0` disables it.
    #[serde(default = "default_comment_refresh")]
    pub comment_refresh_seconds: u64,
}

impl SyncConfig {
    /// Tree-index debounce window.
    pub fn tree_debounce(&self) -> Duration {
        Duration::from_millis(self.tree_debounce_ms)
    }

    /// Comment debounce window.
    pub fn comment_debounce(&self) -> Duration {
        Duration::from_millis(self.comment_debounce_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tree_debounce_ms: default_tree_debounce(),
            comment_debounce_ms: default_comment_debounce(),
            comment_refresh_seconds: default_comment_refresh(),
        }
    }
}

fn default_tree_debounce() -> u64 {
    5000
}

fn default_comment_debounce() -> u64 {
    2000
}

fn default_comment_refresh() -> u64 {
    30
}
