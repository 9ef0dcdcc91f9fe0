//! Remote directory backend configuration.

use serde::{Deserialize, Serialize};

/// Remote directory client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Provider type: `"http"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// URL of the single JSON-over-HTTP endpoint.
    #[serde(default)]
    pub endpoint: String,
    /// Transport timeout in seconds. The engine itself adds no deadlines.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// Optional key sent with every request.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: String::new(),
            request_timeout_seconds: default_timeout(),
            api_key: None,
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_timeout() -> u64 {
    60
}
