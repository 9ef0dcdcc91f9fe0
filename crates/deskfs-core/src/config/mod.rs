//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a serde default, so an empty configuration
//! is valid and yields a memory-backed session.

pub mod bootstrap;
pub mod cache;
pub mod drag;
pub mod logging;
pub mod remote;
pub mod sync;

use serde::{Deserialize, Serialize};

use self::bootstrap::BootstrapConfig;
use self::cache::CacheConfig;
use self::drag::DragConfig;
use self::logging::LoggingConfig;
use self::remote::RemoteConfig;
use self::sync::SyncConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote directory backend settings.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Local cache store settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Debounced document sync settings.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Well-known names located at boot.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    /// Pointer drag thresholds.
    #[serde(default)]
    pub drag: DragConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `DESKFS`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DESKFS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Load configuration from a single explicit file, still honouring
    /// `DESKFS__*` environment overrides.
    pub fn load_file(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(true))
            .add_source(
                config::Environment::with_prefix("DESKFS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to read '{path}': {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
