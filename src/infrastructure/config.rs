//! Application configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Where character records are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordBackend {
    /// Remote record service over HTTP
    Http,
    /// Process-local store; records are lost on restart
    Memory,
}

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Record service base URL
    pub record_service_url: String,
    /// Identity the character record is stored under
    pub character_identity: String,
    pub record_backend: RecordBackend,
    pub record_request_timeout: Duration,

    /// Quiet period before edits are saved
    pub save_debounce: Duration,

    /// Optional JSON catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,
    /// Optional cap on total attribute points
    pub attribute_point_cap: Option<u64>,

    /// HTTP server port
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            record_service_url: env::var("RECORD_SERVICE_URL")
                .unwrap_or_else(|_| "https://recruiting.verylongdomaintotestwith.ca".to_string()),
            character_identity: env::var("CHARACTER_IDENTITY")
                .unwrap_or_else(|_| "anonymous".to_string()),
            record_backend: parse_backend(
                &env::var("RECORD_BACKEND").unwrap_or_else(|_| "http".to_string()),
            )?,
            record_request_timeout: Duration::from_secs(
                env::var("RECORD_REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("RECORD_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),

            save_debounce: Duration::from_millis(
                env::var("SAVE_DEBOUNCE_MS")
                    .unwrap_or_else(|_| "500".to_string())
                    .parse()
                    .context("SAVE_DEBOUNCE_MS must be a whole number of milliseconds")?,
            ),

            catalog_path: env::var("CATALOG_PATH").ok().map(PathBuf::from),
            attribute_point_cap: env::var("ATTRIBUTE_POINT_CAP")
                .ok()
                .map(|v| v.parse())
                .transpose()
                .context("ATTRIBUTE_POINT_CAP must be a non-negative integer")?,

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }
}

fn parse_backend(value: &str) -> Result<RecordBackend> {
    match value.to_ascii_lowercase().as_str() {
        "http" => Ok(RecordBackend::Http),
        "memory" => Ok(RecordBackend::Memory),
        other => bail!("RECORD_BACKEND must be 'http' or 'memory', got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!(parse_backend("http").unwrap(), RecordBackend::Http);
        assert_eq!(parse_backend("Memory").unwrap(), RecordBackend::Memory);
        assert!(parse_backend("sqlite").is_err());
    }
}
