// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

use crate::http::RangePolicy;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Zero disables HTTP/1.1 keep-alive
    pub keep_alive_timeout: u64,
    /// Per-request header read timeout in seconds
    pub read_timeout: u64,
    /// Shutdown grace period in seconds
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP protocol behaviour
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HttpConfig {
    /// Answer for ranges starting at or past the end of a resource
    #[serde(default)]
    pub start_past_end: RangePolicy,
}
