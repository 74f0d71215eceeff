//! Error types for the valuation service.

use thiserror::Error;

/// Result type alias using the shared error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for valuation crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Record store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Notification delivery failure
    #[error("Notification error: {0}")]
    Notification(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through context wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self.root() {
            Self::Timeout => 408,
            Self::Notification(_) => 502,
            _ => 500,
        }
    }
}
