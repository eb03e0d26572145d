//! Configuration management for Materna
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{MaternaError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main configuration structure for Materna
///
/// Holds everything the client needs: where the advisor backend lives and
/// the retrieval tuning values sent with each chat request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Advisor backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Chat request tuning settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Advisor backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the advisor backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout applied to every backend request (seconds)
    ///
    /// Expiry surfaces as a network error; the backend contract itself
    /// specifies no timeout, so this is a client-side bound.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Chat request tuning configuration
///
/// These values ride along on every `/chat` request; retrieval itself is
/// owned entirely by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of knowledge chunks the backend should retrieve
    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// Minimum similarity score for retrieved chunks
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

fn default_top_k() -> u32 {
    3
}

fn default_similarity_threshold() -> f32 {
    0.1
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from a file with environment and CLI overrides
    ///
    /// Falls back to defaults with a logged warning when the file does not
    /// exist. Environment variables override file values, and CLI flags
    /// override both.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed CLI arguments for overrides
    ///
    /// # Examples
    ///
    /// ```
    /// use materna::cli::Cli;
    /// use materna::config::Config;
    ///
    /// let config = Config::load("does-not-exist.yaml", &Cli::default()).unwrap();
    /// assert_eq!(config.backend.base_url, "http://localhost:5000");
    /// ```
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Parse configuration from a YAML file
    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables: `MATERNA_API_BASE`, `MATERNA_TIMEOUT_SECONDS`.
    fn apply_env_vars(&mut self) {
        if let Ok(base) = std::env::var("MATERNA_API_BASE") {
            if !base.is_empty() {
                tracing::debug!("Overriding backend base URL from environment");
                self.backend.base_url = base;
            }
        }

        if let Ok(timeout) = std::env::var("MATERNA_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(seconds) => self.backend.timeout_seconds = seconds,
                Err(_) => tracing::warn!(
                    "Ignoring invalid MATERNA_TIMEOUT_SECONDS value: {}",
                    timeout
                ),
            }
        }
    }

    /// Apply command-line overrides
    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base) = &cli.api_base {
            tracing::debug!("Overriding backend base URL from CLI: {}", base);
            self.backend.base_url = base.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the base URL is not a valid
    /// http(s) URL, the timeout is zero, `top_k` is zero, or the similarity
    /// threshold lies outside `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.backend.base_url).map_err(|e| {
            MaternaError::Config(format!(
                "invalid backend base URL '{}': {}",
                self.backend.base_url, e
            ))
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(MaternaError::Config(format!(
                    "unsupported backend URL scheme '{}': expected http or https",
                    other
                ))
                .into());
            }
        }

        if self.backend.timeout_seconds == 0 {
            return Err(
                MaternaError::Config("backend timeout must be greater than zero".to_string())
                    .into(),
            );
        }

        if self.chat.top_k == 0 {
            return Err(MaternaError::Config("chat top_k must be at least 1".to_string()).into());
        }

        if !(0.0..=1.0).contains(&self.chat.similarity_threshold) {
            return Err(MaternaError::Config(format!(
                "chat similarity_threshold must be within [0.0, 1.0], got {}",
                self.chat.similarity_threshold
            ))
            .into());
        }

        Ok(())
    }
}
