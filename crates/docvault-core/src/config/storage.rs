//! Object store, staging, and sharing configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Object store provider: `"drive"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Directory where uploads are staged before being pushed remotely.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: String,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Google Drive provider configuration.
    #[serde(default)]
    pub drive: DriveConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            staging_dir: default_staging_dir(),
            max_upload_size_bytes: default_max_upload(),
            drive: DriveConfig::default(),
        }
    }
}

/// Google Drive v3 provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Path to the service-account JSON key file.
    #[serde(default)]
    pub credentials_path: String,
    /// OAuth scope requested for the access token.
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Base URL of the Drive metadata API.
    #[serde(default = "default_api_base")]
    pub api_base_url: String,
    /// Base URL of the Drive media upload API.
    #[serde(default = "default_upload_base")]
    pub upload_base_url: String,
    /// Per-call HTTP timeout in seconds.
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            credentials_path: String::new(),
            scope: default_scope(),
            api_base_url: default_api_base(),
            upload_base_url: default_upload_base(),
            timeout_seconds: default_http_timeout(),
        }
    }
}

/// File sharing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShareConfig {
    /// Recipient used when a share request names no email.
    #[serde(default)]
    pub default_recipient: Option<String>,
}

fn default_provider() -> String {
    "drive".to_string()
}

fn default_staging_dir() -> String {
    "./data/uploads".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}

fn default_scope() -> String {
    "https://www.googleapis.com/auth/drive".to_string()
}

fn default_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_upload_base() -> String {
    "https://www.googleapis.com/upload/drive/v3".to_string()
}

fn default_http_timeout() -> u64 {
    30
}
