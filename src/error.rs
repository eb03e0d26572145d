//! Error types for Materna
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Failure taxonomy for advisor backend calls
///
/// Every gateway call resolves to one of two failure classes: the request
/// never completed (`Network`), or an HTTP response was received but
/// indicates failure (`Application`). Callers map the two onto different
/// user-visible states, so they are never collapsed into one variant.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never completed: connection refused, DNS failure, timeout
    #[error("Network error: {0}")]
    Network(String),

    /// An HTTP response arrived but indicates failure, or a success envelope
    /// carried a non-success status field
    #[error("Application error (HTTP {status}): {message}")]
    Application {
        /// HTTP status code of the response
        status: u16,
        /// Error detail from the response body, or a parse failure note
        message: String,
    },
}

impl GatewayError {
    /// Classify a reqwest error from a request that never produced a response
    pub fn network(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("request timed out: {}", err))
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Main error type for Materna operations
///
/// Encompasses configuration loading, gateway failures bubbled past the
/// sync layer, and local state violations in the session store and
/// message timeline.
#[derive(Error, Debug)]
pub enum MaternaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend gateway errors (network or application)
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Session store errors (invalid selection, create failures)
    #[error("Session error: {0}")]
    Session(String),

    /// Message timeline errors (send while history load in flight, etc.)
    #[error("Timeline error: {0}")]
    Timeline(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Materna operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
