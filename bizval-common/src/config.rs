//! Configuration management for the valuation service.
//!
//! The service reads a single configuration file at `~/.bizval/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (BIZVAL_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `BIZVAL_BIND_ADDRESS` → network.bind
//! - `BIZVAL_PORT` → service.port
//! - `BIZVAL_LOG_LEVEL` → observability.log_level
//! - `BIZVAL_LOG_FORMAT` → observability.log_format
//! - `BIZVAL_NOTIFICATION_ENDPOINT` → notification.endpoint
//! - `BIZVAL_DEFAULT_CURRENCY` → valuation.default_currency

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default HTTP port of the valuation service.
pub const DEFAULT_PORT: u16 = 4480;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".bizval"),
        |dirs| dirs.home_dir().join(".bizval"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Network Configuration
// ============================================================================

/// Network configuration.
///
/// Default bind is `127.0.0.1` (local only). Set to `0.0.0.0` behind a proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_bind_address")]
    pub bind: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

/// HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// Port number for the service (default: 4480)
    #[serde(default)]
    pub port: Option<u16>,
}

// ============================================================================
// Observability
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets forced to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Notification / Storage / Valuation
// ============================================================================

/// Outbound report delivery.
///
/// Reports are forwarded to a notification service which owns the actual
/// email transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the notification service, e.g. `http://127.0.0.1:4431`
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_notification_timeout")]
    pub timeout_secs: u64,

    /// Attempts per report before giving up
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            timeout_secs: default_notification_timeout(),
            retry_count: default_retry_count(),
        }
    }
}

fn default_notification_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Maximum records kept in memory; the oldest are evicted first.
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
        }
    }
}

fn default_max_records() -> usize {
    10_000
}

/// Valuation defaults applied while normalizing submitted forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationSettings {
    /// Currency used when a form omits one
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl Default for ValuationSettings {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "usd".into()
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub notification: NotificationConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub valuation: ValuationSettings,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("BIZVAL_BIND_ADDRESS") {
            self.network.bind = bind;
        }
        if let Some(port) = lookup("BIZVAL_PORT") {
            match port.parse() {
                Ok(p) => self.service.port = Some(p),
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid BIZVAL_PORT"),
            }
        }
        if let Some(level) = lookup("BIZVAL_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("BIZVAL_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(endpoint) = lookup("BIZVAL_NOTIFICATION_ENDPOINT") {
            self.notification.endpoint = Some(endpoint);
            self.notification.enabled = true;
        }
        if let Some(currency) = lookup("BIZVAL_DEFAULT_CURRENCY") {
            self.valuation.default_currency = currency.to_lowercase();
        }
    }

    /// Save configuration to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create config directory {}", dir.display())
                })?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Get the effective bind address.
    pub fn bind_address(&self) -> &str {
        &self.network.bind
    }

    /// Get the effective service port.
    pub fn port(&self) -> u16 {
        self.service.port.unwrap_or(DEFAULT_PORT)
    }

    /// Get the `host:port` the HTTP server listens on.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address(), self.port())
    }
}
