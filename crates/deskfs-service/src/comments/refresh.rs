//! Periodic pull of the remote comment document.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use deskfs_core::traits::remote::RemoteDirectory;

use super::store::CommentStore;

/// Refreshes the comment store from remote on a fixed interval.
#[derive(Debug)]
pub struct CommentRefresher {
    comments: Arc<CommentStore>,
    remote: Arc<dyn RemoteDirectory>,
    interval: Duration,
}

impl CommentRefresher {
    /// Create a refresher.
    pub fn new(
        comments: Arc<CommentStore>,
        remote: Arc<dyn RemoteDirectory>,
        interval: Duration,
    ) -> Self {
        Self {
            comments,
            remote,
            interval,
        }
    }

    /// Run until the cancel signal is received.
    pub async fn run(self, mut cancel: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "Comment refresher started");

        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Comment refresher received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match self.comments.refresh_from_remote(self.remote.as_ref()).await {
                        Ok(true) => debug!("Comments refreshed from remote"),
                        Ok(false) => {}
                        Err(e) => warn!(error = %e, "Comment refresh failed"),
                    }
                }
            }
        }
    }
}
