//! Normalized error type for backend calls.
//!
//! Every failure leaving [`ApiClient`](crate::ApiClient) is folded into a
//! single [`ApiError`] so screens can render it without inspecting transport
//! details.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Message shown when the backend could not be reached.
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection.";
/// Message shown for 401 responses.
pub const UNAUTHORIZED_MESSAGE: &str = "Your session has expired. Please log in again.";
/// Message shown for 404 responses.
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";
/// Fallback message for 422 responses without a backend message.
pub const VALIDATION_MESSAGE: &str = "Please correct the highlighted fields.";
/// Message shown for 500 responses.
pub const SERVER_MESSAGE: &str = "Server error. Please try again later.";

/// Broad classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never produced an HTTP response.
    Network,
    /// HTTP 401.
    Unauthorized,
    /// HTTP 422 with field-level messages.
    Validation,
    /// HTTP 404.
    NotFound,
    /// HTTP 500.
    Server,
    /// Response body could not be decoded into the expected shape.
    Decode,
    /// Client configuration is unusable (bad base URL).
    Config,
    /// Any other status, or a `success: false` envelope.
    Other,
}

/// Error shape surfaced to callers: `{message, errors?, status?}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Classification used for control flow.
    pub kind: ErrorKind,
    /// User-facing message.
    pub message: String,
    /// Field-level validation messages (422 only).
    pub errors: BTreeMap<String, Vec<String>>,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
}

/// Error body as returned by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Backend message.
    #[serde(default)]
    pub message: Option<String>,
    /// Field errors keyed by input name.
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: BTreeMap::new(),
            status,
        }
    }

    /// Transport-level failure (DNS, refused connection, reset...).
    #[must_use]
    pub fn network() -> Self {
        Self::new(ErrorKind::Network, NETWORK_MESSAGE, None)
    }

    /// Response body did not match the expected schema.
    #[must_use]
    pub fn decode(detail: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorKind::Decode,
            format!("Unexpected response from server: {detail}"),
            None,
        )
    }

    /// Unusable client configuration.
    #[must_use]
    pub fn config(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, detail, None)
    }

    /// Backend answered 2xx with `success: false`.
    #[must_use]
    pub fn rejected(message: Option<String>) -> Self {
        Self::new(
            ErrorKind::Other,
            message.unwrap_or_else(|| "Request was not successful.".to_string()),
            None,
        )
    }

    /// Builds the normalized error for a non-2xx response.
    #[must_use]
    pub fn from_status(status: u16, body: Option<ErrorBody>) -> Self {
        let body = body.unwrap_or_default();
        let (kind, message) = match status {
            401 => (ErrorKind::Unauthorized, UNAUTHORIZED_MESSAGE.to_string()),
            404 => (ErrorKind::NotFound, NOT_FOUND_MESSAGE.to_string()),
            422 => (
                ErrorKind::Validation,
                body.message
                    .clone()
                    .unwrap_or_else(|| VALIDATION_MESSAGE.to_string()),
            ),
            500 => (ErrorKind::Server, SERVER_MESSAGE.to_string()),
            other => (
                ErrorKind::Other,
                body.message
                    .clone()
                    .unwrap_or_else(|| format!("Request failed with status {other}")),
            ),
        };

        Self {
            kind,
            message,
            errors: body.errors.unwrap_or_default(),
            status: Some(status),
        }
    }

    /// Maps a reqwest failure that happened before a status was available.
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err)
        } else if err.is_builder() {
            Self::config(err.to_string())
        } else {
            Self::network()
        }
    }

    /// Returns true for 401 responses.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    /// First validation message for a field, if any.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages_are_substituted() {
        let body = ErrorBody {
            message: Some("Unauthenticated.".to_string()),
            errors: None,
        };
        let err = ApiError::from_status(401, Some(body));
        assert!(err.is_unauthorized());
        assert_eq!(err.message, UNAUTHORIZED_MESSAGE);
        assert_eq!(err.status, Some(401));

        assert_eq!(ApiError::from_status(404, None).message, NOT_FOUND_MESSAGE);
        assert_eq!(ApiError::from_status(500, None).message, SERVER_MESSAGE);
        assert_eq!(ApiError::network().message, NETWORK_MESSAGE);
    }

    #[test]
    fn test_validation_keeps_field_errors() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"message":"The email has already been taken.","errors":{"email":["The email has already been taken."]}}"#,
        )
        .unwrap();
        let err = ApiError::from_status(422, Some(body));
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "The email has already been taken.");
        assert_eq!(
            err.field_error("email"),
            Some("The email has already been taken.")
        );
        assert_eq!(err.field_error("password"), None);
    }

    #[test]
    fn test_validation_without_message_uses_fallback() {
        let err = ApiError::from_status(422, None);
        assert_eq!(err.message, VALIDATION_MESSAGE);
    }

    #[test]
    fn test_other_status_prefers_backend_message() {
        let err = ApiError::from_status(
            429,
            Some(ErrorBody {
                message: Some("Too Many Attempts.".to_string()),
                errors: None,
            }),
        );
        assert_eq!(err.kind, ErrorKind::Other);
        assert_eq!(err.message, "Too Many Attempts.");

        let err = ApiError::from_status(418, None);
        assert_eq!(err.message, "Request failed with status 418");
    }
}
