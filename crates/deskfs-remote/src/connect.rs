//! Build the configured remote directory client.

use std::sync::Arc;

use tracing::info;

use deskfs_core::config::remote::RemoteConfig;
use deskfs_core::error::AppError;
use deskfs_core::result::AppResult;
use deskfs_core::traits::remote::RemoteDirectory;

use crate::providers::MemoryRemoteDirectory;

/// Create the remote directory selected by `config.provider`.
pub fn connect(config: &RemoteConfig) -> AppResult<Arc<dyn RemoteDirectory>> {
    match config.provider.as_str() {
        #[cfg(feature = "http")]
        "http" => {
            info!(endpoint = %config.endpoint, "Connecting HTTP remote directory");
            Ok(Arc::new(crate::providers::HttpRemoteDirectory::new(config)?))
        }
        "memory" => {
            info!("Using in-memory remote directory");
            Ok(Arc::new(MemoryRemoteDirectory::new()))
        }
        other => Err(AppError::configuration(format!(
            "Unknown remote provider: '{other}'. Supported: http, memory"
        ))),
    }
}
