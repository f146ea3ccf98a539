//! Error types for the rivet adapter.
//!
//! This module defines `RivetError`, the unified error type used throughout
//! the crate. The variants split into the adapter taxonomy surfaced to
//! callers (`Config`, `Validation`, `NotFound`, `Backend`, `Download`) and
//! the transport substrate (`Http`, `HttpStatus`, `Timeout`, `Serialization`)
//! that read operations surface directly and probed operations carry as the
//! underlying cause.

use std::time::Duration;

use thiserror::Error;

/// Maximum length for HTTP error response bodies kept in error messages.
const MAX_ERROR_BODY_LEN: usize = 500;

/// Unified error type for all rivet operations.
#[derive(Error, Debug)]
pub enum RivetError {
    /// Configuration error - missing or invalid connection settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller omitted a required discriminator or supplied an unresolvable
    /// reference.
    #[error("validation error: {0}")]
    Validation(String),

    /// The backend reported no such record for a direct fetch.
    #[error("ticket record not found: {id}")]
    NotFound {
        /// The ID of the record that was not found.
        id: String,
    },

    /// Every attempted call shape for a write or discovery operation failed.
    #[error("backend rejected every call shape for {operation}")]
    Backend {
        /// The operation whose call shapes were exhausted.
        operation: String,
        /// The last underlying failure, kept for diagnostics.
        #[source]
        source: Option<Box<RivetError>>,
    },

    /// Every attempted download call shape failed, or none returned data.
    #[error("no download call shape returned data for attachment {attachment_id}")]
    Download {
        /// The attachment that could not be downloaded.
        attachment_id: u64,
        /// The last underlying failure, kept for diagnostics.
        #[source]
        source: Option<Box<RivetError>>,
    },

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP response returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, truncated for readability.
        body: String,
    },

    /// Request timed out.
    #[error("request timed out after {duration:?} during {operation}")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the downloaded attachment to disk failed.
    #[error("failed to write attachment file: {0}")]
    Io(#[from] std::io::Error),
}

impl RivetError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        RivetError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        RivetError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        RivetError::Validation(message.into())
    }

    /// Creates a not found error for a record ID.
    pub fn not_found(id: impl Into<String>) -> Self {
        RivetError::NotFound { id: id.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        RivetError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates a backend error after call-shape exhaustion.
    pub fn backend(operation: impl Into<String>, last: Option<RivetError>) -> Self {
        RivetError::Backend {
            operation: operation.into(),
            source: last.map(Box::new),
        }
    }

    /// Creates a download error after call-shape exhaustion.
    pub fn download(attachment_id: u64, last: Option<RivetError>) -> Self {
        RivetError::Download {
            attachment_id,
            source: last.map(Box::new),
        }
    }

    /// Creates an `HttpStatus` error, truncating oversized bodies.
    pub fn http_status(status: reqwest::StatusCode, body: String) -> Self {
        RivetError::HttpStatus {
            status,
            body: truncate_body(body),
        }
    }

    /// Returns true if the backend reported the record as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RivetError::NotFound { .. })
    }
}

/// Truncates an HTTP error body so error messages stay readable.
fn truncate_body(body: String) -> String {
    if body.len() > MAX_ERROR_BODY_LEN {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX_ERROR_BODY_LEN)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...[truncated]", &body[..cut])
    } else {
        body
    }
}
