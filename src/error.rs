//! Unified error type hierarchy for the RUL Dashboard
//!
//! Provides structured error handling with FetchError, ConfigError and AppError.

use std::io;
use thiserror::Error;

/// Failures raised by the Fetch Client.
///
/// `Connection` and `Decode` together form the ConnectionError class (the
/// backend could not be reached or did not speak JSON); `Api` is the
/// ApiError class (the backend answered with a non-success status).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Connection failed for {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("API returned HTTP {status} for {url}")]
    Api { status: u16, url: String },

    #[error("Invalid response body from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl FetchError {
    /// True for transport failures and unreadable bodies.
    pub fn is_connection(&self) -> bool {
        matches!(self, FetchError::Connection { .. } | FetchError::Decode { .. })
    }

    /// True when the backend answered with a non-success status.
    pub fn is_api(&self) -> bool {
        matches!(self, FetchError::Api { .. })
    }

    /// The URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Connection { url, .. }
            | FetchError::Api { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }
}

/// Configuration file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Global error type for the dashboard
///
/// Provides unified error categorization and user-facing messages.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// Backend request failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Settings persist or deserialize error
    #[error("Settings error: {0}")]
    Settings(String),

    /// Logging or runtime initialization failed
    #[error("Initialization failed: {0}")]
    Init(String),

    /// File I/O error (read/write/delete)
    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Get a user-facing error message suitable for UI display
    pub fn user_message(&self) -> String {
        match self {
            AppError::Fetch(e) if e.is_connection() => "Connection Failed".to_string(),
            AppError::Fetch(FetchError::Api { status, .. }) => {
                format!("Backend returned an error (HTTP {})", status)
            }
            AppError::Fetch(e) => format!("Backend request failed: {}", e),
            AppError::Settings(msg) => format!("Settings error: {}", msg),
            AppError::Init(msg) => format!("Failed to initialize application: {}", msg),
            AppError::Io(msg) => format!("File operation failed: {}", msg),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Settings(e.to_string())
    }
}

/// Top-level result type for operations that may fail.
pub type Result<T> = std::result::Result<T, AppError>;
