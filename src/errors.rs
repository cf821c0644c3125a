use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Required configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Network request failed or returned a failure status
    #[error("Network error: {0}")]
    Network(String),
    /// Failed to parse or serialize structured content
    #[error("Parse error: {0}")]
    Parse(String),
    /// Failed to persist a single record
    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    Url(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(String),
}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Url(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
