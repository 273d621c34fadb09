//! Common error types for BrandHub

use thiserror::Error;

/// Common result type for BrandHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by all lifecycle managers
///
/// Validation and authorization failures are raised locally before any
/// storage or database side effect. Everything else wraps the message of the
/// external call that failed so it can be surfaced to the user unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing required input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource exists but is not owned by the caller
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Object storage upload/remove/download failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database operation failure
    #[error("Database error: {0}")]
    Persistence(String),

    /// Missing or invalid configuration (e.g. an absent API credential)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote AI call or response-parsing failure
    #[error("Analysis error: {0}")]
    RemoteService(String),

    /// I/O operation error outside of object storage (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl Error {
    /// Shorthand for building a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
