use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::client::{Format, HttpConfig, Quality};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Download service connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Gap between two status checks
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_ms: default_poll_interval_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("tubefetch/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Defaults for the download command
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadConfig {
    /// Finished files are saved here when set
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_format")]
    pub default_format: Format,
    /// Used for mp4 when no quality is given on the command line
    #[serde(default = "default_quality")]
    pub default_quality: Option<Quality>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            default_format: default_format(),
            default_quality: default_quality(),
        }
    }
}

fn default_format() -> Format {
    Format::Mp3
}

fn default_quality() -> Option<Quality> {
    Some(Quality::P720)
}

/// Terminal presentation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default = "default_prefs_path")]
    pub prefs_path: PathBuf,
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            prefs_path: default_prefs_path(),
            color: default_color(),
        }
    }
}

fn default_prefs_path() -> PathBuf {
    PathBuf::from(".tubefetch/prefs.toml")
}

fn default_color() -> bool {
    true
}
