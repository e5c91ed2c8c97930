//! Error types for the core library.

use newsdesk_api::ApiError;
use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Not enough scraping credits left for the request.
    #[error("Not enough credits: {requested} requested, {remaining} remaining")]
    InsufficientCredits {
        /// Credits the operation needs.
        requested: u32,
        /// Credits currently available.
        remaining: u32,
    },

    /// System keyring access failed.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl Error {
    /// Returns true if the backend rejected the session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_unauthorized())
    }

    /// The backend error, if this wraps one.
    #[must_use]
    pub const fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
