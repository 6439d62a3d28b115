//! Configuration management for net-sentry
//!
//! This module handles loading, parsing, and validating application
//! configuration from YAML files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Packet capture configuration
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Blocklist configuration
    #[serde(default)]
    pub blocklist: BlocklistConfig,

    /// IP reputation lookup configuration
    #[serde(default)]
    pub reputation: ReputationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // First, expand environment variables in the YAML string
        let expanded = expand_env_vars(yaml);
        serde_yaml::from_str(&expanded)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))
    }

    /// Load configuration from environment variables with prefix NET_SENTRY_
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Server config from env
        if let Ok(host) = std::env::var("NET_SENTRY_SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("NET_SENTRY_SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid port number".to_string()))?;
        }

        // Capture config from env
        if let Ok(interface) = std::env::var("NET_SENTRY_CAPTURE_INTERFACE") {
            config.capture.interface = interface;
        }
        if let Ok(subnet) = std::env::var("NET_SENTRY_CAPTURE_SUBNET") {
            config.capture.subnet = subnet;
        }

        // Blocklist config from env
        if let Ok(path) = std::env::var("NET_SENTRY_BLOCKLIST_PATH") {
            config.blocklist.path = path;
        }

        // Reputation config from env
        if let Ok(api_key) = std::env::var("NET_SENTRY_REPUTATION_API_KEY") {
            config.reputation.enabled = true;
            config.reputation.api_key = Some(api_key);
        }

        Ok(config)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Packet capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    /// Network interface to monitor (USB tethering interface by default)
    #[serde(default = "default_interface")]
    pub interface: String,

    /// CIDR range assumed to belong to the monitored device
    #[serde(default = "default_subnet")]
    pub subnet: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            subnet: default_subnet(),
        }
    }
}

fn default_interface() -> String {
    "usb0".to_string()
}

fn default_subnet() -> String {
    // Common Android USB tethering range
    "192.168.42.0/24".to_string()
}

/// Blocklist configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlocklistConfig {
    /// Path to the plain-text blocklist file, one IP per line
    #[serde(default = "default_blocklist_path")]
    pub path: String,
}

impl Default for BlocklistConfig {
    fn default() -> Self {
        Self {
            path: default_blocklist_path(),
        }
    }
}

fn default_blocklist_path() -> String {
    "blocklist.txt".to_string()
}

/// IP reputation lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReputationConfig {
    /// Whether reputation lookups are performed
    #[serde(default)]
    pub enabled: bool,

    /// API key for the reputation service
    pub api_key: Option<String>,

    /// Reputation API endpoint
    #[serde(default = "default_reputation_endpoint")]
    pub endpoint: String,

    /// Report age window passed to the API, in days
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,

    /// Request timeout in seconds
    #[serde(default = "default_lookup_timeout")]
    pub timeout_secs: u64,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            endpoint: default_reputation_endpoint(),
            max_age_days: default_max_age_days(),
            timeout_secs: default_lookup_timeout(),
        }
    }
}

fn default_reputation_endpoint() -> String {
    "https://api.abuseipdb.com/api/v2/check".to_string()
}

fn default_max_age_days() -> u32 {
    90
}

fn default_lookup_timeout() -> u64 {
    10
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    FileRead(String),

    /// Error parsing configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Expand environment variables in a string
///
/// Supports `${VAR_NAME}` syntax
fn expand_env_vars(input: &str) -> String {
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .expect("Invalid regex pattern for environment variable expansion");

    re.replace_all(input, |caps: &regex_lite::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
