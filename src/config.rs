//! Configuration for the rivet adapter.
//!
//! This module handles loading connection settings from environment
//! variables, with validation to ensure the backend URL is usable. The
//! resulting `Config` is an explicit value constructed once by the caller
//! and handed to the client; no ambient global state is consulted after
//! construction.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::RivetError;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a Zammad backend.
///
/// Only the base URL is required; username and password are passed through
/// to the backend when present.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Zammad instance (e.g., `https://tickets.example.com`).
    pub base_url: String,

    /// Username for HTTP basic authentication.
    pub username: Option<String>,

    /// Password for HTTP basic authentication.
    pub password: Option<String>,

    /// Per-request timeout applied to every connection.
    pub timeout: Duration,
}

impl Config {
    /// Creates a configuration from a base URL, validating it.
    ///
    /// # Errors
    ///
    /// Returns `RivetError::Config` if the URL is empty or not http(s).
    pub fn new(base_url: impl Into<String>) -> Result<Self, RivetError> {
        let base_url = Self::validate_base_url(base_url.into())?;
        Ok(Config {
            base_url,
            username: None,
            password: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Sets the basic-auth credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ZAMMAD_URL` (required): base URL of the Zammad instance
    /// - `ZAMMAD_USERNAME` (optional): basic-auth username
    /// - `ZAMMAD_PASSWORD` (optional): basic-auth password
    /// - `ZAMMAD_TIMEOUT_SECS` (optional): per-request timeout override
    ///
    /// A `.env` file in the working directory is honored if present.
    ///
    /// # Errors
    ///
    /// Returns `RivetError::Config` if `ZAMMAD_URL` is missing or invalid.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = Config::from_env()?;
    /// ```
    pub fn from_env() -> Result<Self, RivetError> {
        dotenvy::dotenv().ok();

        let base_url = Self::get_required_env("ZAMMAD_URL")?;

        let mut config = Config::new(base_url)?;
        config.username = Self::get_optional_env("ZAMMAD_USERNAME");
        config.password = Self::get_optional_env("ZAMMAD_PASSWORD");

        if let Some(secs) = Self::get_optional_env("ZAMMAD_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                RivetError::invalid_config("ZAMMAD_TIMEOUT_SECS must be a whole number of seconds")
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Gets a required environment variable, failing if missing or empty.
    fn get_required_env(name: &str) -> Result<String, RivetError> {
        env::var(name)
            .map_err(|_| RivetError::missing_env(name))
            .and_then(|value| {
                if value.trim().is_empty() {
                    Err(RivetError::missing_env(name))
                } else {
                    Ok(value)
                }
            })
    }

    /// Gets an optional environment variable, treating empty as absent.
    fn get_optional_env(name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Validates and normalizes the base URL.
    fn validate_base_url(url: String) -> Result<String, RivetError> {
        let url = url.trim().trim_end_matches('/').to_string();

        if url.is_empty() {
            return Err(RivetError::invalid_config("base URL must not be empty"));
        }

        let parsed = Url::parse(&url)
            .map_err(|e| RivetError::invalid_config(format!("invalid base URL: {}", e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(RivetError::invalid_config(
                "base URL must start with http:// or https://",
            ));
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: tests that modify environment variables are avoided so the suite
    // stays safe under parallel execution; `from_env` is a thin composition
    // of the validated constructors below.

    #[test]
    fn test_validate_base_url_removes_trailing_slash() {
        let result = Config::validate_base_url("https://tickets.example.com/".to_string()).unwrap();
        assert_eq!(result, "https://tickets.example.com");
    }

    #[test]
    fn test_validate_base_url_requires_scheme() {
        assert!(Config::validate_base_url("tickets.example.com".to_string()).is_err());
        assert!(Config::validate_base_url("ftp://tickets.example.com".to_string()).is_err());
    }

    #[test]
    fn test_validate_base_url_rejects_empty() {
        let err = Config::validate_base_url("   ".to_string()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_new_defaults() {
        let config = Config::new("https://tickets.example.com").unwrap();
        assert_eq!(config.base_url, "https://tickets.example.com");
        assert!(config.username.is_none());
        assert!(config.password.is_none());
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_with_credentials() {
        let config = Config::new("https://tickets.example.com")
            .unwrap()
            .with_credentials("agent", "s3cret");
        assert_eq!(config.username.as_deref(), Some("agent"));
        assert_eq!(config.password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_with_timeout() {
        let config = Config::new("https://tickets.example.com")
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
