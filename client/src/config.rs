//! Client configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use crate::chat::constants::DEFAULT_PREVIEW_ROWS;
use crate::error::ConfigError;
use std::env;
use std::time::Duration;

/// Path of the backend endpoint that answers natural-language queries
pub const PROCESS_QUERY_PATH: &str = "/process_query/";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend configuration
    pub backend: BackendConfig,
    /// Display configuration
    pub display: DisplayConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL of the query backend (scheme, host and port)
    pub api_url: String,
    /// Request timeout in seconds (0 disables the client-side timeout)
    pub request_timeout_secs: u64,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Number of result rows shown inline before a table is truncated
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                api_url: "http://localhost:8000".to_string(),
                request_timeout_secs: 30,
            },
            display: DisplayConfig {
                preview_rows: DEFAULT_PREVIEW_ROWS,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    ///
    /// A `.env` file in the working directory is honoured outside of tests.
    ///
    /// # Errors
    /// * Returns `ConfigError::InvalidValue` if a variable is set but cannot be parsed,
    ///   or if the preview row count is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let defaults = Self::default();

        let api_url = env::var("CRICKET_API_URL").unwrap_or(defaults.backend.api_url);
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "CRICKET_API_URL".to_string(),
                api_url,
            ));
        }

        let request_timeout_secs = parse_var(
            "CRICKET_REQUEST_TIMEOUT_SECS",
            defaults.backend.request_timeout_secs,
        )?;

        let preview_rows = parse_var("CRICKET_TABLE_PREVIEW_ROWS", defaults.display.preview_rows)?;
        if preview_rows == 0 {
            return Err(ConfigError::InvalidValue(
                "CRICKET_TABLE_PREVIEW_ROWS".to_string(),
                "must be > 0".to_string(),
            ));
        }

        Ok(Self {
            backend: BackendConfig {
                api_url,
                request_timeout_secs,
            },
            display: DisplayConfig { preview_rows },
        })
    }

    /// Full URL of the query endpoint
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}{}",
            self.backend.api_url.trim_end_matches('/'),
            PROCESS_QUERY_PATH
        )
    }

    /// Request timeout, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.backend.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}
