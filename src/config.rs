//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! Process ids and payment methods live here rather than in code, so a
//! deployment can point the dashboard at a different network without a
//! rebuild.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::credits::PaymentMethod;
use crate::process_ids::{ProcessIdNode, ProcessRegistry};
use crate::query::GatewayConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub credits: CreditsConfig,

    #[serde(default)]
    pub delegation: DelegationConfig,

    #[serde(default)]
    pub process_ids: BTreeMap<String, ProcessIdNode>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Credit-notice service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsConfig {
    #[serde(default = "default_credits_url")]
    pub service_url: String,

    /// Process whose incoming credit notices are charted
    #[serde(default)]
    pub process_id: String,

    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,

    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    #[serde(default = "default_service_timeout")]
    pub request_timeout_ms: u64,
}

fn default_credits_url() -> String {
    "http://localhost:8090".to_string()
}

fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_service_timeout() -> u64 {
    15_000
}

impl CreditsConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours.saturating_mul(60 * 60))
    }
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            service_url: default_credits_url(),
            process_id: String::new(),
            payment_methods: Vec::new(),
            cache_ttl_hours: default_cache_ttl_hours(),
            request_timeout_ms: default_service_timeout(),
        }
    }
}

/// Delegation service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DelegationConfig {
    #[serde(default = "default_delegation_url")]
    pub service_url: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_service_timeout")]
    pub request_timeout_ms: u64,

    /// Load a snapshot when the server starts
    #[serde(default = "default_refresh_on_start")]
    pub refresh_on_start: bool,
}

fn default_delegation_url() -> String {
    "http://localhost:8091".to_string()
}

fn default_page_size() -> usize {
    1000
}

fn default_refresh_on_start() -> bool {
    true
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self {
            service_url: default_delegation_url(),
            page_size: default_page_size(),
            request_timeout_ms: default_service_timeout(),
            refresh_on_start: default_refresh_on_start(),
        }
    }
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

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
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

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
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

    /// Candidate config files, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        [
            std::env::var("PERMADASH_CONFIG").ok().map(PathBuf::from),
            dirs::config_dir().map(|p| p.join("permadash").join("config.toml")),
            Some(PathBuf::from("/etc/permadash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        for path in Self::search_paths() {
            if path.exists() {
                match Self::load_with_env(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    pub fn process_registry(&self) -> ProcessRegistry {
        ProcessRegistry::new(self.process_ids.clone())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup, normally the process environment
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // API overrides
        if let Some(host) = lookup("PERMADASH_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("PERMADASH_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid PERMADASH_API_PORT: {}", port),
            }
        }

        // Collaborator overrides
        if let Some(url) = lookup("PERMADASH_GATEWAY_URL") {
            self.gateway.url = url;
        }
        if let Some(url) = lookup("PERMADASH_CREDITS_URL") {
            self.credits.service_url = url;
        }
        if let Some(process_id) = lookup("PERMADASH_CREDITS_PROCESS") {
            self.credits.process_id = process_id;
        }
        if let Some(url) = lookup("PERMADASH_DELEGATION_URL") {
            self.delegation.service_url = url;
        }

        // Logging overrides
        if let Some(level) = lookup("PERMADASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("PERMADASH_LOG_FORMAT") {
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
    r#"# Permadash Configuration
#
# Environment variables override these settings:
# - PERMADASH_CONFIG (path to this file)
# - PERMADASH_API_HOST
# - PERMADASH_API_PORT
# - PERMADASH_GATEWAY_URL
# - PERMADASH_CREDITS_URL
# - PERMADASH_CREDITS_PROCESS
# - PERMADASH_DELEGATION_URL
# - PERMADASH_LOG_LEVEL
# - PERMADASH_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8082

# Request timeout in seconds
request_timeout_secs = 30

[gateway]
# Arweave GraphQL gateway (queries are POSTed to <url>/graphql)
url = "https://arweave.net"

# Gateway request timeout (ms)
request_timeout_ms = 15000

[credits]
# Credit-notice service
service_url = "http://localhost:8090"

# Process whose incoming credit notices are charted
process_id = ""

# How long a fetched timeline is reused before refetching (hours)
cache_ttl_hours = 24

# Service request timeout (ms)
request_timeout_ms = 15000

# Payment methods offered for charting; leave empty to accept any id
# [[credits.payment_methods]]
# id = "<token process id>"
# label = "wAR"

[delegation]
# Delegation service
service_url = "http://localhost:8091"

# Accounts requested per page
page_size = 1000

# Service request timeout (ms)
request_timeout_ms = 15000

# Load a delegation snapshot at startup
refresh_on_start = true

# Named process ids shown by the process-id browser.
# Top-level strings form their own group; tables nest.
[process_ids]
# ao = "<process id>"
#
# [process_ids.game]
# main_process = "<process id>"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.api.port, 8082);
        assert_eq!(config.gateway.url, "https://arweave.net");
        assert_eq!(config.credits.cache_ttl(), Duration::from_secs(24 * 60 * 60));
        assert!(config.credits.payment_methods.is_empty());
        assert!(config.process_ids.is_empty());
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();

        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.credits.cache_ttl_hours, 24);
        assert_eq!(config.delegation.page_size, 1000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [api]
            port = 9000

            [credits]
            process_id = "game-process"
            cache_ttl_hours = 1

            [[credits.payment_methods]]
            id = "war"
            label = "wAR"

            [process_ids]
            ao = "ao-id"

            [process_ids.game]
            main_process = "main-id"
            "#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.credits.process_id, "game-process");
        assert_eq!(config.credits.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.credits.payment_methods[0].label, "wAR");

        let registry = config.process_registry();
        assert_eq!(registry.lookup("game.main_process"), Some("main-id"));
        assert_eq!(registry.groups().len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[api\nport = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PERMADASH_API_PORT", "7000"),
            ("PERMADASH_GATEWAY_URL", "http://gw.local"),
            ("PERMADASH_CREDITS_PROCESS", "pid"),
            ("PERMADASH_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.port, 7000);
        assert_eq!(config.gateway.url, "http://gw.local");
        assert_eq!(config.credits.process_id, "pid");
        assert!(config.logging.is_json());
        assert_eq!(config.api.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "PERMADASH_API_PORT").then(|| "abc".to_string()));
        assert_eq!(config.api.port, 8082);
    }
}
