//! Error types for VK API operations

/// Errors from authentication and API calls.
///
/// Every operation reports at most one of these; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid client configuration: {0}")]
    Construction(String),

    #[error("invalid argument: {0}")]
    Validation(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),

    /// Carries the provider's `error_description` verbatim
    #[error("{0}")]
    Authorization(String),

    #[error("invalid epoch timestamp: {0}")]
    Format(String),

    /// Error envelope returned by a method call
    #[error("VK API error {code}: {message}")]
    Api { code: i64, message: String },
}

/// Result alias for VK API operations.
pub type Result<T> = std::result::Result<T, Error>;
