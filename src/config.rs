//! Configuration management.
//!
//! Settings come from an optional TOML file with environment variable
//! overrides for deployment secrets. Everything has a sane default so
//! the service starts with no config file at all.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_database_path() -> PathBuf {
    PathBuf::from("companies.db")
}

fn default_ipapi_url() -> String {
    "http://api.ipapi.com".to_string()
}

/// Service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Enable debug behavior (verbose default logging).
    #[serde(default)]
    pub debug: bool,
    /// Address the HTTP server listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// SQLite database file for company records.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Base URL of the ipapi.com-compatible geolocation service.
    #[serde(default = "default_ipapi_url")]
    pub ipapi_url: String,
    /// Access key for the geolocation service.
    #[serde(default)]
    pub ipapi_key: String,
    /// Countries allowed to create and delete companies.
    #[serde(default)]
    pub allowed_countries: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            listen_addr: default_listen_addr(),
            timeout_secs: default_timeout_secs(),
            database_path: default_database_path(),
            ipapi_url: default_ipapi_url(),
            ipapi_key: String::new(),
            allowed_countries: Vec::new(),
        }
    }
}

impl Settings {
    /// Per-request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Default tracing filter when `RUST_LOG` is unset: verbose when
    /// requested on the command line or via the `debug` config key.
    pub fn default_log_filter(&self, verbose: bool) -> &'static str {
        if verbose || self.debug {
            "corpdir=info"
        } else {
            "corpdir=warn"
        }
    }
}

/// Load settings from `path` (or defaults when absent), then apply
/// environment overrides: `IPAPI_KEY` and `CORPDIR_DATABASE`.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => Settings::default(),
    };

    if let Ok(key) = std::env::var("IPAPI_KEY") {
        if !key.is_empty() {
            settings.ipapi_key = key;
        }
    }
    if let Ok(database) = std::env::var("CORPDIR_DATABASE") {
        if !database.is_empty() {
            settings.database_path = PathBuf::from(database);
        }
    }

    Ok(settings)
}
