//! Configuration Module
//!
//! Handles loading and managing fetcher and server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigurationError;
use crate::retry::RetryPolicy;

/// Fetcher and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL that fetch endpoints are resolved against
    pub upstream_url: String,
    /// Optional bearer token sent with every upstream request
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
    /// Attempts per fetch before giving up
    pub max_attempts: u32,
    /// Linear backoff unit in milliseconds
    pub base_delay_ms: u64,
    /// Default TTL in seconds for cached results
    pub default_ttl: u64,
    /// Maximum number of entries the in-memory cache can hold
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an attempt count, mapping zero and negative values to `0` so that
/// [`Config::retry_policy`] rejects them instead of falling back to the default.
fn parse_attempts(raw: Option<&str>, default: u32) -> u32 {
    match raw.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(n) if n <= 0 => 0,
        Some(n) => u32::try_from(n).unwrap_or(u32::MAX),
        None => default,
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `UPSTREAM_URL` - Upstream base URL (default: http://localhost:8080)
    /// - `API_KEY` - Bearer token (default: none)
    /// - `REQUEST_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `MAX_ATTEMPTS` - Attempts per fetch (default: 3; zero or negative is rejected)
    /// - `BASE_DELAY_MS` - Backoff unit in milliseconds (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 3600)
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            api_key: env::var("API_KEY").ok().filter(|k| !k.is_empty()),
            request_timeout: env_or("REQUEST_TIMEOUT", defaults.request_timeout),
            max_attempts: parse_attempts(
                env::var("MAX_ATTEMPTS").ok().as_deref(),
                defaults.max_attempts,
            ),
            base_delay_ms: env_or("BASE_DELAY_MS", defaults.base_delay_ms),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Builds the retry policy, rejecting a zero attempt count.
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigurationError> {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: "http://localhost:8080".to_string(),
            api_key: None,
            request_timeout: 30,
            max_attempts: 3,
            base_delay_ms: 1000,
            default_ttl: 3600,
            max_entries: 1000,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.upstream_url, "http://localhost:8080");
        assert!(config.api_key.is_none());
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.default_ttl, 3600);
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "UPSTREAM_URL",
            "API_KEY",
            "REQUEST_TIMEOUT",
            "MAX_ATTEMPTS",
            "BASE_DELAY_MS",
            "DEFAULT_TTL",
            "MAX_ENTRIES",
            "SERVER_PORT",
            "CLEANUP_INTERVAL",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.upstream_url, "http://localhost:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.default_ttl(), Duration::from_secs(3600));
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = Config {
            max_attempts: 5,
            base_delay_ms: 250,
            ..Config::default()
        };

        let policy = config.retry_policy().unwrap();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.base_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = Config {
            max_attempts: 0,
            ..Config::default()
        };

        assert_eq!(
            config.retry_policy().unwrap_err(),
            ConfigurationError::ZeroAttempts
        );
    }

    #[test]
    fn test_negative_attempts_rejected() {
        let config = Config {
            max_attempts: parse_attempts(Some("-1"), 3),
            ..Config::default()
        };

        assert_eq!(config.max_attempts, 0);
        assert_eq!(
            config.retry_policy().unwrap_err(),
            ConfigurationError::ZeroAttempts
        );
    }

    #[test]
    fn test_parse_attempts() {
        assert_eq!(parse_attempts(Some("5"), 3), 5);
        assert_eq!(parse_attempts(Some(" 2 "), 3), 2);
        assert_eq!(parse_attempts(Some("0"), 3), 0);
        assert_eq!(parse_attempts(Some("-7"), 3), 0);
        assert_eq!(parse_attempts(Some("99999999999"), 3), u32::MAX);
        assert_eq!(parse_attempts(Some("many"), 3), 3);
        assert_eq!(parse_attempts(None, 3), 3);
    }
}
