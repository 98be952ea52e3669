//! Error types for the configuration module

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic error with a message
    #[error("Error: {0}")]
    Generic(String),

    /// An error that occurred during parsing
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A key that is not part of the configuration
    #[error("invalid key: '{0}' is not a valid configuration key.")]
    InvalidKey(String),
}
