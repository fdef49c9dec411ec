//! Shared error taxonomy
//!
//! Every crate in the workspace converts its own error type into
//! [`Error`] at its public boundary, so callers downstream of the
//! orchestrator and the façade only ever match on one enum.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The core error taxonomy (see the error handling design).
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid media: {0}")]
    InvalidMedia(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("busy: {0}")]
    Busy(String),

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable short name for logging and failure classification.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "InvalidInput",
            Error::InvalidMedia(_) => "InvalidMedia",
            Error::NotFound(_) => "NotFound",
            Error::Conflict(_) => "Conflict",
            Error::Busy(_) => "Busy",
            Error::ProviderUnavailable(_) => "ProviderUnavailable",
            Error::RateLimited(_) => "RateLimited",
            Error::Timeout(_) => "Timeout",
            Error::Cancelled(_) => "Cancelled",
            Error::Internal(_) => "Internal",
        }
    }

    /// Whether a provider adapter should retry a call that failed with
    /// this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RateLimited(_) | Error::ProviderUnavailable(_))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_kinds() {
        assert!(Error::RateLimited("x".into()).is_retryable());
        assert!(Error::ProviderUnavailable("x".into()).is_retryable());
        assert!(!Error::Internal("x".into()).is_retryable());
        assert!(!Error::NotFound("x".into()).is_retryable());
    }

    #[test]
    fn kind_names() {
        assert_eq!(Error::Busy("q".into()).kind(), "Busy");
        assert_eq!(Error::InvalidMedia("m".into()).kind(), "InvalidMedia");
    }
}
