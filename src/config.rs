//! Configuration management for the application
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// How reader failures are turned into HTTP statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatusPolicy {
    /// Every reader failure is a 500
    #[default]
    Collapse,
    /// Status follows the reader's error kind
    ByKind,
}

impl fmt::Display for ErrorStatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorStatusPolicy::Collapse => write!(f, "collapse"),
            ErrorStatusPolicy::ByKind => write!(f, "by_kind"),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Path the query routes are nested under; "/ping" is always served at the root too
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Per-request deadline handed to the reader; 0 disables it
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub error_status: ErrorStatusPolicy,
}

fn default_api_prefix() -> String {
    "/v1".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            api_prefix: default_api_prefix(),
            request_timeout_seconds: default_request_timeout(),
            error_status: ErrorStatusPolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_seconds > 0).then(|| Duration::from_secs(self.request_timeout_seconds))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Logging format: "json" or "text"
    pub format: String,
    /// Default log level if no RUST_LOG is set
    pub default_level: String,
    /// Custom filter for dependency logs
    pub dependency_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            default_level: "info".to_string(),
            dependency_filter: Some(
                "hyper=warn,h2=warn,tower=info,tower_http=info,tokio_util=warn,mio=warn,axum=info"
                    .to_string(),
            ),
        }
    }
}

/// StatsD configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsdConfig {
    pub prefix: String,
    pub addr: String,
    pub use_tags: bool,
    pub enabled: bool,
}

impl Default for StatsdConfig {
    fn default() -> Self {
        Self {
            prefix: "spanquery".to_string(),
            addr: "127.0.0.1:8125".to_string(),
            use_tags: false,
            enabled: false,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub statsd: StatsdConfig,
}

impl Config {
    /// Load configuration from environment variables and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv().ok();

        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("SPANQUERY_").split("__"));

        // SPANQUERY_CONFIG points at an optional TOML file layered on top
        if let Some(config_path) = std::env::var_os("SPANQUERY_CONFIG") {
            let path = Path::new(&config_path);
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment.extract().map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.is_empty() {
            return Err(ConfigError::MissingConfig("Server bind address is required".to_string()));
        }

        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue("Server port must be non-zero".to_string()));
        }

        if !self.server.api_prefix.is_empty() && !self.server.api_prefix.starts_with('/') {
            return Err(ConfigError::InvalidValue(format!(
                "API prefix must start with '/': {}",
                self.server.api_prefix
            )));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::InvalidValue(format!(
                "Logging format must be \"text\" or \"json\": {}",
                self.logging.format
            )));
        }

        if self.statsd.enabled && self.statsd.addr.is_empty() {
            return Err(ConfigError::MissingConfig(
                "StatsD address is required when metrics are enabled".to_string(),
            ));
        }

        Ok(())
    }
}
