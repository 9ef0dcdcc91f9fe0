//! Persisted shape of one folder listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use deskfs_entity::item::Item;

/// One cached folder listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedListing {
    /// Normalised folder key (see [`crate::keys::folder_key`]).
    pub folder_key: String,
    /// The listing as last fetched.
    pub items: Vec<Item>,
    /// When it was stored.
    pub timestamp: DateTime<Utc>,
}

impl CachedListing {
    /// Stamp a listing with the current time.
    pub fn new(folder_key: &str, items: &[Item]) -> Self {
        Self {
            folder_key: folder_key.to_string(),
            items: items.to_vec(),
            timestamp: Utc::now(),
        }
    }
}
