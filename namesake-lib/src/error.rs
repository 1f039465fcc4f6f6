//! Error types for namesake

use thiserror::Error;

/// Result type alias for namesake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in namesake operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid process configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Failed to load or run the embedding model
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Failed to store or retrieve from the vector store
    #[error("store error: {0}")]
    Store(String),

    /// The vector store asked us to slow down
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// A vector or index does not have the configured dimension
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reading a names file failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Store(err.to_string())
    }
}
