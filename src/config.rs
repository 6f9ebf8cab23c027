//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! The store passphrase is deliberately env-only (`MOODLOG_PASSPHRASE`);
//! putting it in the config file next to the data it obfuscates would
//! defeat the point.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub webhook: WebhookSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Entry store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_sync_interval")]
    pub sync_interval_secs: u64,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("moodlog").to_string_lossy().to_string())
        .unwrap_or_else(|| "./moodlog_data".to_string())
}

fn default_sync_interval() -> u64 {
    30
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sync_interval_secs: default_sync_interval(),
        }
    }
}

/// Webhook delivery configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookSettings {
    /// Target URL; empty disables delivery
    #[serde(default)]
    pub url: String,

    /// Shared secret for payload signing
    #[serde(default)]
    pub secret: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("moodlog").join("config.toml")),
            Some(PathBuf::from("./moodlog.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// The store passphrase, if set in the environment
    pub fn passphrase() -> Option<String> {
        std::env::var("MOODLOG_PASSPHRASE")
            .ok()
            .filter(|p| !p.is_empty())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = std::env::var("MOODLOG_DATA_DIR") {
            self.store.data_dir = data_dir;
        }
        if let Ok(interval) = std::env::var("MOODLOG_SYNC_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse() {
                self.store.sync_interval_secs = secs;
            }
        }

        if let Ok(url) = std::env::var("MOODLOG_WEBHOOK_URL") {
            self.webhook.url = url;
        }
        if let Ok(secret) = std::env::var("MOODLOG_WEBHOOK_SECRET") {
            self.webhook.secret = Some(secret);
        }

        if let Ok(level) = std::env::var("MOODLOG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MOODLOG_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Moodlog Configuration
#
# Environment variables override these settings:
# - MOODLOG_DATA_DIR
# - MOODLOG_SYNC_INTERVAL_SECS
# - MOODLOG_WEBHOOK_URL
# - MOODLOG_WEBHOOK_SECRET
# - MOODLOG_LOG_LEVEL
# - MOODLOG_LOG_FORMAT
#
# The store passphrase is env-only: MOODLOG_PASSPHRASE

[store]
# Directory holding the entry collection and derived state
data_dir = "~/.local/share/moodlog"

# How often to reconcile with external writers (seconds)
sync_interval_secs = 30

[webhook]
# Target URL for outbound event notifications (empty = disabled)
url = ""

# Shared secret for HMAC payload signatures
# secret = ""

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
