// src/error.rs

//! Unified error handling for the feed client and proxy.

use thiserror::Error;

use crate::models::FetchAttempt;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed at the transport level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("HTTP {status} from {target}")]
    HttpStatus { target: String, status: u16 },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Every endpoint candidate failed; `last` is the most recent failure.
    #[error("All fetch attempts failed after {} attempt(s): {last}", .attempts.len())]
    Exhausted {
        attempts: Vec<FetchAttempt>,
        last: String,
    },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Attempts recorded before the chain gave up, if this is an exhaustion error.
    pub fn attempts(&self) -> &[FetchAttempt] {
        match self {
            Self::Exhausted { attempts, .. } => attempts,
            _ => &[],
        }
    }
}
