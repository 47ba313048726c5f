//! Error types for the pagecast core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for pagecast.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A required setting is absent or blank.
    #[error("Set {key} in the environment or .env file")]
    MissingSetting { key: &'static str },

    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A line of the post log could not be decoded.
    #[error("Post log error in {path} at line {line}: {message}")]
    PostLog {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The post log to publish from does not exist.
    #[error("Post log {path} not found")]
    MissingPostLog { path: PathBuf },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a missing setting error for an environment key.
    pub fn missing(key: &'static str) -> Self {
        Self::MissingSetting { key }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a missing post log error.
    pub fn missing_post_log(path: impl Into<PathBuf>) -> Self {
        Self::MissingPostLog { path: path.into() }
    }

    /// Create a new post log error.
    pub fn post_log(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::PostLog {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
