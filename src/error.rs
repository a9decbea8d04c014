//! Error types for the banking core

use thiserror::Error;

/// Result type alias for banking-core operations
pub type Result<T> = std::result::Result<T, BankableError>;

#[derive(Error, Debug)]
pub enum BankableError {

    // =============================
    // Domain Errors
    // =============================

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Market data error: {0}")]
    MarketDataError(String),

    #[error("Rate limit exceeded after {0} retries")]
    RateLimitExceeded(u32),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("UUID parse error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
