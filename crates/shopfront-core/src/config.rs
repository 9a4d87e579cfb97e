//! Runtime configuration.
//!
//! Loaded from `shopfront.toml` (or JSON, by extension), then overridden by
//! `SHOPFRONT_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["shopfront.toml", ".shopfront.toml", "shopfront.json"];

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "SHOPFRONT_API_URL";
/// Environment variable overriding `server.host`.
pub const ENV_HOST: &str = "SHOPFRONT_HOST";
/// Environment variable overriding `server.port`.
pub const ENV_PORT: &str = "SHOPFRONT_PORT";
/// Environment variable overriding `logging.level`.
pub const ENV_LOG: &str = "SHOPFRONT_LOG";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Storefront configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorefrontConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Outbound fetch policy.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Checkout settings.
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the backend, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Seconds a cached GET response stays fresh.
    #[serde(default = "default_revalidate_secs")]
    pub revalidate_secs: u64,

    /// Most URLs held in the response cache.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// CSRF token sent as `X-CSRFToken` on every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_revalidate_secs() -> u64 {
    60
}

fn default_cache_max_entries() -> usize {
    1024
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            revalidate_secs: default_revalidate_secs(),
            cache_max_entries: default_cache_max_entries(),
            csrf_token: None,
        }
    }
}

impl ApiConfig {
    /// Revalidation window for cached responses.
    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs)
    }
}

/// Outbound fetch policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchConfig {
    /// Total per-attempt timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connection timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Retries for idempotent requests.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_connect_timeout_ms() -> u64 {
    2000
}

fn default_max_retries() -> u32 {
    1
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines (for development).
    #[default]
    Pretty,
    /// One JSON object per line (for log aggregation).
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `shopfront_data=debug`.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Checkout settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckoutConfig {
    /// Flat delivery charge in whole currency units, e.g. `120` or `60.5`.
    #[serde(default)]
    pub delivery_charge: f64,
}

impl CheckoutConfig {
    /// Delivery charge in minor units (hundredths), rounded.
    pub fn delivery_charge_minor(&self) -> i64 {
        (self.delivery_charge * 100.0).round() as i64
    }
}

impl StorefrontConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let config: Self = if is_json(path) {
            serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        } else {
            toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        };
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find a config file in `start` or any parent directory.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Apply `SHOPFRONT_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_PORT,
                value: port.clone(),
            })?;
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.logging.level = level;
        }
        self.validate()
    }

    /// Apply overrides from the process environment.
    pub fn apply_process_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    /// Check values that would otherwise fail late.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "api.base_url",
                value: self.api.base_url.clone(),
            });
        }
        if self.api.cache_max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                key: "api.cache_max_entries",
                value: "0".to_string(),
            });
        }
        if self.fetch.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fetch.timeout_ms",
                value: "0".to_string(),
            });
        }
        if !self.checkout.delivery_charge.is_finite() || self.checkout.delivery_charge < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "checkout.delivery_charge",
                value: self.checkout.delivery_charge.to_string(),
            });
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("json")
}

/// Generate a default `shopfront.toml`.
pub fn generate_default_config() -> String {
    r#"# Storefront configuration

[api]
# Backend REST API; SHOPFRONT_API_URL overrides this.
base_url = "http://localhost:8000"
# Seconds a cached catalog response stays fresh.
revalidate_secs = 60
# Most backend URLs kept in the response cache.
cache_max_entries = 1024
# csrf_token = ""

[fetch]
timeout_ms = 5000
connect_timeout_ms = 2000
max_retries = 1

[server]
host = "127.0.0.1"
port = 3000

[logging]
# RUST_LOG takes precedence when set.
level = "info"
# "pretty" or "json"
format = "pretty"

[checkout]
# Flat delivery charge added to every order, in taka.
delivery_charge = 0.0
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api.revalidate(), Duration::from_secs(60));
        assert_eq!(config.server.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: StorefrontConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example.com"
            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.revalidate_secs, 60);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.fetch.max_retries, 1);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://shop.example.com"),
            (ENV_PORT, "8080"),
            (ENV_LOG, "debug"),
        ]
        .into_iter()
        .collect();
        let mut config = StorefrontConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.com");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = StorefrontConfig::default();
        let err = config
            .apply_env(|key| (key == ENV_PORT).then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_PORT, .. }));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = StorefrontConfig::default();
        config.api.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_delivery_charge_in_minor_units() {
        let config: StorefrontConfig = toml::from_str("[checkout]\ndelivery_charge = 120.5").unwrap();
        assert_eq!(config.checkout.delivery_charge_minor(), 12_050);
        assert_eq!(StorefrontConfig::default().checkout.delivery_charge_minor(), 0);

        let mut negative = StorefrontConfig::default();
        negative.checkout.delivery_charge = -1.0;
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_load_save_and_discover() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let path = dir.path().join("shopfront.toml");
        let mut config = StorefrontConfig::default();
        config.server.port = 4100;
        config.save(&path).unwrap();

        assert_eq!(StorefrontConfig::discover(&nested), Some(path.clone()));
        let loaded = StorefrontConfig::load(&path).unwrap();
        assert_eq!(loaded.server.port, 4100);

        let json_path = dir.path().join("copy.json");
        loaded.save(&json_path).unwrap();
        assert_eq!(StorefrontConfig::load(&json_path).unwrap(), loaded);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopfront.toml");
        std::fs::write(&path, "[server]\nport = \"x\"").unwrap();
        assert!(matches!(
            StorefrontConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            StorefrontConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
