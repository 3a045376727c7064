/// Configuration for the quotes backend.
/// Reads config.json from ~/.config/quotes/config.json (or platform equivalent),
/// or from the path in QUOTES_CONFIG.
use quotes_core::config::{RemoteSettings, SyncSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Root for durable storage and logs.
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub sync: SyncSettings,
}

fn default_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            data_dir: None,
            remote: RemoteSettings::default(),
            sync: SyncSettings::default(),
        }
    }
}

impl BackendConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir)
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir().join("storage")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir().join("logs").join("backend.log")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotes")
}

/// QUOTES_CONFIG if set, else ~/.config/quotes/config.json
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("QUOTES_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotes")
        .join("config.json")
}

/// Load config from path. Returns defaults if the file is missing or broken.
pub fn load_config(path: &Path) -> BackendConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config {}: {}", path.display(), e);
            BackendConfig::default()
        }),
        Err(_) => {
            log::info!("No config at {}, using defaults", path.display());
            BackendConfig::default()
        }
    }
}
