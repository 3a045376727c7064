/// Shared configuration types for reconciliation and the remote source.
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Periodic reconciliation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

/// Remote quote source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default = "default_remote_url")]
    pub url: String,
    /// Category assigned to every fetched quote.
    #[serde(default = "default_remote_category")]
    pub category: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    15
}

fn default_remote_url() -> String {
    "https://jsonplaceholder.typicode.com/posts".to_string()
}

fn default_remote_category() -> String {
    "Server".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl SyncSettings {
    /// Tick interval, never shorter than one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl RemoteSettings {
    /// Request timeout, never shorter than one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            url: default_remote_url(),
            category: default_remote_category(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
